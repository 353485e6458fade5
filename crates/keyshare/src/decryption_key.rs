// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use anyhow::Context;
use keyper_events::{DecryptionKey, EpochId, InstanceId, P2PMessage};
use keyper_shcrypto::{Bn254Scheme, EpochKeyScheme, EpochSecretKey};
use tracing::{debug, info, warn};

use crate::{check_eon, EpochLocks, HandlerError, KeyperDb, ValidationError};

/// Stores decryption keys produced by other keypers so late shares for the epoch are
/// ignored.
pub struct DecryptionKeyHandler {
    instance_id: InstanceId,
    db: Arc<dyn KeyperDb>,
    scheme: Arc<dyn EpochKeyScheme>,
    locks: EpochLocks,
}

impl DecryptionKeyHandler {
    pub fn new(instance_id: InstanceId, db: Arc<dyn KeyperDb>) -> Self {
        Self::with_scheme(instance_id, db, Arc::new(Bn254Scheme))
    }

    pub fn with_scheme(
        instance_id: InstanceId,
        db: Arc<dyn KeyperDb>,
        scheme: Arc<dyn EpochKeyScheme>,
    ) -> Self {
        Self {
            instance_id,
            db,
            scheme,
            locks: EpochLocks::new(),
        }
    }

    pub fn with_locks(mut self, locks: EpochLocks) -> Self {
        self.locks = locks;
        self
    }

    pub async fn validate(&self, msg: &DecryptionKey) -> Result<EpochId, ValidationError> {
        self.check(msg).await.inspect_err(|err| {
            warn!(eon = msg.eon, "rejecting decryption key: {err}")
        })
    }

    async fn check(&self, msg: &DecryptionKey) -> Result<EpochId, ValidationError> {
        let result = check_eon(self.db.as_ref(), self.instance_id, msg.instance_id, msg.eon).await?;
        let epoch = msg.parse_epoch_id()?;
        let key = EpochSecretKey::from_bytes(&msg.key).map_err(ValidationError::MalformedKey)?;
        let point = self.scheme.epoch_point(&epoch);
        if !self.scheme.verify_key(&key, &result.public_key, &point) {
            return Err(ValidationError::KeyVerificationFailed(epoch));
        }
        Ok(epoch)
    }

    /// Stores the key unless one is already known. Nothing is re-broadcast.
    pub async fn handle(&self, msg: &DecryptionKey) -> Result<Vec<P2PMessage>, HandlerError> {
        let epoch = msg.parse_epoch_id().map_err(ValidationError::from)?;
        let _guard = self.locks.lock(msg.eon, epoch).await;

        let inserted = self
            .db
            .insert_key(msg.eon, &epoch, &msg.key)
            .await
            .with_context(|| format!("failed to store decryption key for epoch {epoch}"))?;
        if inserted {
            info!(eon = msg.eon, epoch = %epoch, "stored decryption key");
        } else {
            debug!(eon = msg.eon, epoch = %epoch, "decryption key already known");
        }
        Ok(vec![])
    }
}
