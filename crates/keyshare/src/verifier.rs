// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use anyhow::anyhow;
use keyper_events::{DecryptionKeyShares, Eon, EpochId, InstanceId, KeyperIndex};
use keyper_shcrypto::{EpochKeyScheme, EpochSecretKeyShare, PureDkgResult};

use crate::{KeyperDb, ValidationError};

/// Checks shared by every message type: right network, representable eon and a successful
/// DKG for it. Returns the decoded DKG result.
pub(crate) async fn check_eon(
    db: &dyn KeyperDb,
    instance_id: InstanceId,
    msg_instance_id: InstanceId,
    eon: Eon,
) -> Result<PureDkgResult, ValidationError> {
    if msg_instance_id != instance_id {
        return Err(ValidationError::WrongInstance {
            want: instance_id,
            have: msg_instance_id,
        });
    }
    if eon > i64::MAX as u64 {
        return Err(ValidationError::EonOverflow(eon));
    }

    let Some(record) = db.get_dkg_result(eon).await? else {
        return Err(ValidationError::NoDkgResult(eon));
    };
    if !record.success {
        return Err(ValidationError::NoDkgResult(eon));
    }
    PureDkgResult::decode(&record.pure_result).map_err(|e| {
        ValidationError::Storage(anyhow!("error while decoding DKG result for eon {eon}: {e}"))
    })
}

/// A share that passed every check, decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedShare {
    pub eon: Eon,
    pub epoch: EpochId,
    pub sender: KeyperIndex,
    pub share: EpochSecretKeyShare,
}

/// Validates inbound share messages against the eon's public material. Reads storage only.
#[derive(Clone)]
pub struct ShareVerifier {
    instance_id: InstanceId,
    db: Arc<dyn KeyperDb>,
    scheme: Arc<dyn EpochKeyScheme>,
}

impl ShareVerifier {
    pub fn new(
        instance_id: InstanceId,
        db: Arc<dyn KeyperDb>,
        scheme: Arc<dyn EpochKeyScheme>,
    ) -> Self {
        Self {
            instance_id,
            db,
            scheme,
        }
    }

    pub async fn verify(&self, msg: &DecryptionKeyShares) -> Result<VerifiedShare, ValidationError> {
        let result = check_eon(self.db.as_ref(), self.instance_id, msg.instance_id, msg.eon).await?;

        let [key_share] = msg.shares.as_slice() else {
            return Err(ValidationError::WrongShareArity(msg.shares.len()));
        };
        let epoch = key_share.parse_epoch_id()?;

        let sender = msg.keyper_index;
        let public_key_share = usize::try_from(sender)
            .ok()
            .and_then(|i| result.public_key_shares.get(i))
            .ok_or(ValidationError::SenderOutOfRange {
                sender,
                num_keypers: result.num_keypers,
            })?;

        let share =
            EpochSecretKeyShare::from_bytes(&key_share.share).map_err(ValidationError::MalformedShare)?;
        let point = self.scheme.epoch_point(&epoch);
        if !self.scheme.verify_share(&share, public_key_share, &point) {
            return Err(ValidationError::CryptoVerificationFailed { sender, epoch });
        }

        Ok(VerifiedShare {
            eon: msg.eon,
            epoch,
            sender,
            share,
        })
    }
}
