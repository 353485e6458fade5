// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use derivative::Derivative;
use keyper_utils::ArcBytes;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::{Eon, EpochId, EpochIdError, InstanceId, KeyperIndex};

/// One keyper's epoch secret key share for a single epoch, as it travels on the wire.
#[derive(Derivative, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
pub struct KeyShare {
    #[derivative(Debug(format_with = "keyper_utils::formatters::hexf"))]
    pub epoch_id: ArcBytes,
    #[derivative(Debug(format_with = "keyper_utils::formatters::hexf"))]
    pub share: ArcBytes,
}

impl KeyShare {
    pub fn new(epoch_id: &EpochId, share: impl Into<ArcBytes>) -> Self {
        Self {
            epoch_id: ArcBytes::from_bytes(epoch_id.to_vec()),
            share: share.into(),
        }
    }

    pub fn parse_epoch_id(&self) -> Result<EpochId, EpochIdError> {
        EpochId::from_slice(&self.epoch_id)
    }
}

/// Broadcast by a keyper once it has computed its share for an epoch.
///
/// The wire format allows batching but only single share messages are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecryptionKeyShares {
    pub instance_id: InstanceId,
    pub eon: Eon,
    pub keyper_index: KeyperIndex,
    pub shares: Vec<KeyShare>,
}

impl DecryptionKeyShares {
    /// Builds the single share message the network expects.
    pub fn single(
        instance_id: InstanceId,
        eon: Eon,
        keyper_index: KeyperIndex,
        epoch_id: &EpochId,
        share: impl Into<ArcBytes>,
    ) -> Self {
        Self {
            instance_id,
            eon,
            keyper_index,
            shares: vec![KeyShare::new(epoch_id, share)],
        }
    }

    pub fn first_share(&self) -> Option<&KeyShare> {
        self.shares.first()
    }
}

impl Display for DecryptionKeyShares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let epoch = self
            .first_share()
            .and_then(|s| s.parse_epoch_id().ok())
            .map(|e| e.hex())
            .unwrap_or_else(|| "<none>".to_string());
        write!(
            f,
            "DecryptionKeyShares {{ instance_id: {}, eon: {}, keyper_index: {}, epoch: {}, shares: {} }}",
            self.instance_id,
            self.eon,
            self.keyper_index,
            epoch,
            self.shares.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_epoch() {
        let epoch = EpochId::from_u64(1);
        let msg = DecryptionKeyShares::single(1, 0, 2, &epoch, vec![1, 2, 3]);
        let shown = msg.to_string();
        assert!(shown.contains(&epoch.hex()));
        assert!(shown.contains("keyper_index: 2"));
    }

    #[test]
    fn display_survives_garbage_epoch() {
        let msg = DecryptionKeyShares {
            instance_id: 1,
            eon: 0,
            keyper_index: 0,
            shares: vec![KeyShare {
                epoch_id: ArcBytes::from_bytes(vec![1]),
                share: ArcBytes::default(),
            }],
        };
        assert!(msg.to_string().contains("<none>"));
    }
}
