// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod decryption_key;
mod decryption_key_shares;

pub use decryption_key::*;
pub use decryption_key_shares::*;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::{Eon, InstanceId};

/// The message types a handler can declare interest in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    DecryptionKeyShares,
    DecryptionKey,
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::DecryptionKeyShares => write!(f, "DecryptionKeyShares"),
            MessageKind::DecryptionKey => write!(f, "DecryptionKey"),
        }
    }
}

/// Envelope for everything gossiped between keypers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum P2PMessage {
    DecryptionKeyShares(DecryptionKeyShares),
    DecryptionKey(DecryptionKey),
}

impl P2PMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            P2PMessage::DecryptionKeyShares(_) => MessageKind::DecryptionKeyShares,
            P2PMessage::DecryptionKey(_) => MessageKind::DecryptionKey,
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        match self {
            P2PMessage::DecryptionKeyShares(m) => m.instance_id,
            P2PMessage::DecryptionKey(m) => m.instance_id,
        }
    }

    pub fn eon(&self) -> Eon {
        match self {
            P2PMessage::DecryptionKeyShares(m) => m.eon,
            P2PMessage::DecryptionKey(m) => m.eon,
        }
    }
}

impl Display for P2PMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            P2PMessage::DecryptionKeyShares(m) => m.fmt(f),
            P2PMessage::DecryptionKey(m) => m.fmt(f),
        }
    }
}

impl From<DecryptionKeyShares> for P2PMessage {
    fn from(value: DecryptionKeyShares) -> Self {
        P2PMessage::DecryptionKeyShares(value)
    }
}

impl From<DecryptionKey> for P2PMessage {
    fn from(value: DecryptionKey) -> Self {
        P2PMessage::DecryptionKey(value)
    }
}
