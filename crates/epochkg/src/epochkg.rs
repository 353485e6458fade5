// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use keyper_events::{Eon, EpochId, KeyperIndex};
use keyper_shcrypto::{EpochPoint, EpochSecretKey, EpochSecretKeyShare};
use tracing::{debug, info, warn};

use crate::{AggregationError, EonContext, ReconstructionError};

/// One keyper's share for one epoch, decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpochKeyShare {
    pub eon: Eon,
    pub epoch: EpochId,
    pub sender: KeyperIndex,
    pub share: EpochSecretKeyShare,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EpochStatus {
    /// Accepted shares by sender. Never holds `threshold` entries.
    Accumulating(BTreeMap<KeyperIndex, EpochSecretKeyShare>),
    Finalized(EpochSecretKey),
    /// Threshold was reached but no usable key came out. Terminal.
    FinalizedWithError(ReconstructionError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Accumulated { count: usize },
    Finalized,
    AlreadyFinalized,
}

/// Epoch key aggregator for a single eon.
///
/// Built fresh for every reconstruction attempt; nothing here is meant to outlive the call
/// that replays the stored shares into it.
#[derive(Debug)]
pub struct EpochKG {
    context: Arc<EonContext>,
    epochs: BTreeMap<EpochId, EpochStatus>,
    points: HashMap<EpochId, EpochPoint>,
}

impl EpochKG {
    pub fn new(context: Arc<EonContext>) -> Self {
        Self {
            context,
            epochs: BTreeMap::new(),
            points: HashMap::new(),
        }
    }

    pub fn context(&self) -> &EonContext {
        &self.context
    }

    pub fn status(&self, epoch: &EpochId) -> Option<&EpochStatus> {
        self.epochs.get(epoch)
    }

    pub fn secret_key(&self, epoch: &EpochId) -> Option<&EpochSecretKey> {
        match self.epochs.get(epoch) {
            Some(EpochStatus::Finalized(key)) => Some(key),
            _ => None,
        }
    }

    pub fn failure(&self, epoch: &EpochId) -> Option<&ReconstructionError> {
        match self.epochs.get(epoch) {
            Some(EpochStatus::FinalizedWithError(err)) => Some(err),
            _ => None,
        }
    }

    pub fn is_finalized(&self, epoch: &EpochId) -> bool {
        matches!(
            self.epochs.get(epoch),
            Some(EpochStatus::Finalized(_) | EpochStatus::FinalizedWithError(_))
        )
    }

    /// Shares still waiting for threshold.
    pub fn num_shares(&self, epoch: &EpochId) -> usize {
        match self.epochs.get(epoch) {
            Some(EpochStatus::Accumulating(shares)) => shares.len(),
            _ => 0,
        }
    }

    fn epoch_point(&mut self, epoch: &EpochId) -> EpochPoint {
        let scheme = self.context.scheme();
        *self
            .points
            .entry(*epoch)
            .or_insert_with(|| scheme.epoch_point(epoch))
    }

    /// Verifies the share against the sender's eon public key share, then adds it.
    /// Shares for an epoch that already has a key are ignored.
    pub fn handle_share(&mut self, share: EpochKeyShare) -> Result<ShareOutcome, AggregationError> {
        if self.is_finalized(&share.epoch) {
            debug!(
                eon = share.eon,
                epoch = %share.epoch,
                sender = share.sender,
                "epoch already finalized, ignoring share"
            );
            return Ok(ShareOutcome::AlreadyFinalized);
        }

        let public_key_share = *self.context.public_key_share(share.sender)?;
        let point = self.epoch_point(&share.epoch);
        if !self
            .context
            .scheme()
            .verify_share(&share.share, &public_key_share, &point)
        {
            return Err(AggregationError::VerificationFailed {
                sender: share.sender,
                epoch: share.epoch,
            });
        }

        self.add_share(share)
    }

    /// Adds an already trusted share. Reconstructs when the epoch holds exactly `threshold`
    /// shares from distinct senders.
    pub fn add_share(&mut self, share: EpochKeyShare) -> Result<ShareOutcome, AggregationError> {
        let eon = self.context.eon();
        if share.eon != eon {
            return Err(AggregationError::WrongEon {
                want: eon,
                got: share.eon,
            });
        }
        if share.sender >= self.context.num_keypers() {
            return Err(AggregationError::SenderOutOfRange {
                sender: share.sender,
                num_keypers: self.context.num_keypers(),
            });
        }

        let threshold = self.context.threshold();
        let status = self
            .epochs
            .entry(share.epoch)
            .or_insert_with(|| EpochStatus::Accumulating(BTreeMap::new()));

        let shares = match status {
            EpochStatus::Accumulating(shares) => shares,
            EpochStatus::Finalized(_) | EpochStatus::FinalizedWithError(_) => {
                return Ok(ShareOutcome::AlreadyFinalized)
            }
        };

        if shares.contains_key(&share.sender) {
            return Err(AggregationError::DuplicateSender {
                sender: share.sender,
                epoch: share.epoch,
            });
        }
        shares.insert(share.sender, share.share);

        let count = shares.len();
        if (count as u64) < threshold {
            debug!(eon, epoch = %share.epoch, sender = share.sender, count, "share accumulated");
            return Ok(ShareOutcome::Accumulated { count });
        }

        let (senders, values): (Vec<_>, Vec<_>) = std::mem::take(shares).into_iter().unzip();
        let point = self.epoch_point(&share.epoch);
        match self.reconstruct(threshold, &senders, &values, &point) {
            Ok(key) => {
                info!(eon, epoch = %share.epoch, ?senders, "reconstructed epoch secret key");
                self.epochs.insert(share.epoch, EpochStatus::Finalized(key));
                Ok(ShareOutcome::Finalized)
            }
            Err(err) => {
                warn!(eon, epoch = %share.epoch, ?senders, "{err}");
                self.epochs
                    .insert(share.epoch, EpochStatus::FinalizedWithError(err.clone()));
                Err(AggregationError::Reconstruction {
                    epoch: share.epoch,
                    source: err,
                })
            }
        }
    }

    fn reconstruct(
        &self,
        threshold: u64,
        senders: &[KeyperIndex],
        shares: &[EpochSecretKeyShare],
        point: &EpochPoint,
    ) -> Result<EpochSecretKey, ReconstructionError> {
        let scheme = self.context.scheme();
        let key = scheme.reconstruct_key(threshold, senders, shares)?;
        if !scheme.verify_key(&key, self.context.public_key(), point) {
            return Err(ReconstructionError::KeyMismatch);
        }
        Ok(key)
    }
}
