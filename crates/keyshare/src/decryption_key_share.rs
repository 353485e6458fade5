// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use anyhow::Context;
use keyper_epochkg::{EonContext, EpochKG, EpochKeyShare};
use keyper_events::{DecryptionKey, DecryptionKeyShares, EpochId, InstanceId, P2PMessage};
use keyper_shcrypto::{Bn254Scheme, EpochKeyScheme, EpochSecretKeyShare, PureDkgResult};
use keyper_utils::ArcBytes;
use tracing::{debug, info, warn};

use crate::{EpochLocks, HandlerError, KeyperDb, ShareVerifier, ValidationError, VerifiedShare};

/// Turns decryption key shares into decryption keys.
pub struct DecryptionKeyShareHandler {
    instance_id: InstanceId,
    db: Arc<dyn KeyperDb>,
    scheme: Arc<dyn EpochKeyScheme>,
    verifier: ShareVerifier,
    locks: EpochLocks,
}

impl DecryptionKeyShareHandler {
    pub fn new(instance_id: InstanceId, db: Arc<dyn KeyperDb>) -> Self {
        Self::with_scheme(instance_id, db, Arc::new(Bn254Scheme))
    }

    pub fn with_scheme(
        instance_id: InstanceId,
        db: Arc<dyn KeyperDb>,
        scheme: Arc<dyn EpochKeyScheme>,
    ) -> Self {
        Self {
            verifier: ShareVerifier::new(instance_id, db.clone(), scheme.clone()),
            instance_id,
            db,
            scheme,
            locks: EpochLocks::new(),
        }
    }

    /// Share the lock table with other handlers writing keys.
    pub fn with_locks(mut self, locks: EpochLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Accepts the message only if it can be trusted and stored. Never writes.
    pub async fn validate(&self, msg: &DecryptionKeyShares) -> Result<VerifiedShare, ValidationError> {
        self.verifier.verify(msg).await.inspect_err(|err| {
            warn!(
                eon = msg.eon,
                keyper_index = msg.keyper_index,
                "rejecting decryption key share: {err}"
            )
        })
    }

    /// Stores the share and reconstructs the epoch key if the stored shares now reach
    /// threshold. Returns the key to broadcast, if this call produced it.
    pub async fn handle(&self, msg: &DecryptionKeyShares) -> Result<Vec<P2PMessage>, HandlerError> {
        let [key_share] = msg.shares.as_slice() else {
            return Err(ValidationError::WrongShareArity(msg.shares.len()).into());
        };
        let epoch = key_share.parse_epoch_id().map_err(ValidationError::from)?;
        let eon = msg.eon;

        let _guard = self.locks.lock(eon, epoch).await;

        if self.key_exists(msg, &epoch).await? {
            return Ok(vec![]);
        }

        self.db
            .insert_share(eon, &epoch, msg.keyper_index, &key_share.share)
            .await
            .with_context(|| format!("failed to store decryption key share for epoch {epoch}"))?;

        let record = self
            .db
            .get_dkg_result(eon)
            .await?
            .with_context(|| format!("failed to get dkg result for eon {eon} from db"))?;
        if !record.success {
            info!(eon, "ignoring decryption trigger: eon key generation failed");
            return Ok(vec![]);
        }
        let result = PureDkgResult::decode(&record.pure_result)
            .map_err(|source| HandlerError::DkgResult { eon, source })?;
        let threshold = result.threshold;

        let kg = self.aggregate_from_db(result, &epoch).await?;

        if let Some(key) = kg.secret_key(&epoch) {
            let key_bytes = key.to_bytes();
            if !self.db.insert_key(eon, &epoch, &key_bytes).await? {
                debug!(eon, epoch = %epoch, "decryption key was stored concurrently");
                return Ok(vec![]);
            }
            let message = DecryptionKey {
                instance_id: self.instance_id,
                eon,
                epoch_id: ArcBytes::from_bytes(epoch.to_vec()),
                key: ArcBytes::from_bytes(key_bytes),
            };
            info!(eon, epoch = %epoch, "broadcasting decryption key");
            return Ok(vec![message.into()]);
        }

        if let Some(err) = kg.failure(&epoch) {
            return Err(HandlerError::Reconstruction {
                eon,
                epoch,
                source: err.clone(),
            });
        }

        debug!(
            eon,
            epoch = %epoch,
            shares = kg.num_shares(&epoch),
            threshold,
            "waiting for more decryption key shares"
        );
        Ok(vec![])
    }

    async fn key_exists(&self, msg: &DecryptionKeyShares, epoch: &EpochId) -> Result<bool, HandlerError> {
        let exists = self
            .db
            .exists_key(msg.eon, epoch)
            .await
            .with_context(|| format!("failed to query decryption key for epoch {epoch}"))?;
        if exists {
            debug!(
                eon = msg.eon,
                epoch = %epoch,
                sender = msg.keyper_index,
                "decryption key already known"
            );
        }
        Ok(exists)
    }

    /// Replays every stored share for the epoch into a fresh aggregator.
    async fn aggregate_from_db(
        &self,
        result: PureDkgResult,
        epoch: &EpochId,
    ) -> Result<EpochKG, HandlerError> {
        let eon = result.eon;
        let shares = self
            .db
            .select_shares(eon, epoch)
            .await
            .with_context(|| format!("failed to get decryption key shares for epoch {epoch} from db"))?;

        let mut kg = EpochKG::new(Arc::new(EonContext::new(result, self.scheme.clone())));
        for stored in shares {
            let share = match EpochSecretKeyShare::from_bytes(&stored.share) {
                Ok(share) => share,
                Err(err) => {
                    warn!(eon, epoch = %epoch, keyper_index = stored.sender, "invalid decryption key share in db: {err}");
                    continue;
                }
            };
            if let Err(err) = kg.handle_share(EpochKeyShare {
                eon,
                epoch: *epoch,
                sender: stored.sender,
                share,
            }) {
                info!(eon, epoch = %epoch, keyper_index = stored.sender, "failed to process decryption key share: {err}");
            }
        }
        Ok(kg)
    }
}
