// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use keyper_events::{DecryptionKeyShares, Eon, EpochId, InstanceId, KeyperIndex};
use keyper_keyshare::{DkgResultRecord, KeyperDb};
use keyper_shcrypto::{compute_epoch_secret_key, deal, EpochSecretKey, EpochSecretKeyShare, PureDkgResult};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// A dealt eon and everything needed to play any of its keypers.
pub struct TestEon {
    pub instance_id: InstanceId,
    pub results: Vec<PureDkgResult>,
}

impl TestEon {
    pub fn new(instance_id: InstanceId, eon: Eon, num_keypers: u64, threshold: u64) -> Result<Self> {
        let mut rng = ChaCha20Rng::seed_from_u64(eon.wrapping_add(instance_id));
        let results = deal(eon, num_keypers, threshold, &mut rng)?;
        Ok(Self {
            instance_id,
            results,
        })
    }

    pub fn eon(&self) -> Eon {
        self.results[0].eon
    }

    pub fn threshold(&self) -> u64 {
        self.results[0].threshold
    }

    /// Successful DKG result as seen by `keyper`.
    pub fn record(&self, keyper: KeyperIndex) -> Result<DkgResultRecord> {
        Ok(DkgResultRecord {
            success: true,
            pure_result: self.results[keyper as usize].encode()?,
        })
    }

    /// Stores keyper 0's view of this eon.
    pub async fn seed(&self, db: &dyn KeyperDb) -> Result<()> {
        db.insert_dkg_result(self.eon(), &self.record(0)?).await
    }

    pub fn share(&self, sender: KeyperIndex, epoch: &EpochId) -> EpochSecretKeyShare {
        self.results[sender as usize].compute_epoch_secret_key_share(epoch)
    }

    pub fn share_message(&self, sender: KeyperIndex, epoch: &EpochId) -> DecryptionKeyShares {
        DecryptionKeyShares::single(
            self.instance_id,
            self.eon(),
            sender,
            epoch,
            self.share(sender, epoch).to_bytes(),
        )
    }

    /// Claims to come from `sender` but carries the next keyper's share.
    pub fn forged_share_message(&self, sender: KeyperIndex, epoch: &EpochId) -> DecryptionKeyShares {
        let other = (sender + 1) % self.results.len() as u64;
        DecryptionKeyShares::single(
            self.instance_id,
            self.eon(),
            sender,
            epoch,
            self.share(other, epoch).to_bytes(),
        )
    }

    /// The key any `threshold` keypers reconstruct for the epoch.
    pub fn expected_key(&self, epoch: &EpochId) -> Result<EpochSecretKey> {
        let t = self.threshold();
        let senders: Vec<_> = (0..t).collect();
        let shares: Vec<_> = senders.iter().map(|s| self.share(*s, epoch)).collect();
        Ok(compute_epoch_secret_key(&senders, &shares, t)?)
    }
}
