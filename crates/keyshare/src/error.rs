// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use keyper_epochkg::ReconstructionError;
use keyper_events::{Eon, EpochId, EpochIdError, InstanceId, KeyperIndex, MessageKind};
use keyper_shcrypto::CryptoError;
use thiserror::Error;

/// Why an inbound message was dropped before reaching storage.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("instance ID mismatch (want={want}, have={have})")]
    WrongInstance { want: InstanceId, have: InstanceId },
    #[error("eon {0} overflows int64")]
    EonOverflow(Eon),
    #[error("no successful DKG result found for eon {0}")]
    NoDkgResult(Eon),
    #[error("decryption key share message must have exactly one share, got {0}")]
    WrongShareArity(usize),
    #[error("invalid epoch id: {0}")]
    BadEpochId(#[from] EpochIdError),
    #[error("keyper index {sender} out of range for {num_keypers} keypers")]
    SenderOutOfRange {
        sender: KeyperIndex,
        num_keypers: u64,
    },
    #[error("malformed decryption key share: {0}")]
    MalformedShare(CryptoError),
    #[error("malformed decryption key: {0}")]
    MalformedKey(CryptoError),
    #[error("cannot verify secret key share from keyper {sender} for epoch {epoch}")]
    CryptoVerificationFailed { sender: KeyperIndex, epoch: EpochId },
    #[error("decryption key for epoch {0} does not match the eon public key")]
    KeyVerificationFailed(EpochId),
    #[error("no handler accepts {0} messages")]
    UnexpectedMessage(MessageKind),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error("failed to decode DKG result for eon {eon}: {source}")]
    DkgResult { eon: Eon, source: CryptoError },
    #[error("failed to generate decryption key for eon {eon} epoch {epoch} even though we have enough shares: {source}")]
    Reconstruction {
        eon: Eon,
        epoch: EpochId,
        source: ReconstructionError,
    },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
