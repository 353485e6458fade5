// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use keyper_events::{EpochId, KeyperIndex};

use crate::{
    compute_epoch_point, compute_epoch_secret_key, verify_epoch_secret_key,
    verify_epoch_secret_key_share, CryptoError, EonPublicKey, EonPublicKeyShare, EpochPoint,
    EpochSecretKey, EpochSecretKeyShare,
};

/// The threshold primitive as seen by the aggregation engine.
pub trait EpochKeyScheme: Send + Sync {
    fn epoch_point(&self, epoch_id: &EpochId) -> EpochPoint;

    fn verify_share(
        &self,
        share: &EpochSecretKeyShare,
        public_key_share: &EonPublicKeyShare,
        point: &EpochPoint,
    ) -> bool;

    fn reconstruct_key(
        &self,
        threshold: u64,
        keyper_indices: &[KeyperIndex],
        shares: &[EpochSecretKeyShare],
    ) -> Result<EpochSecretKey, CryptoError>;

    fn verify_key(&self, key: &EpochSecretKey, public_key: &EonPublicKey, point: &EpochPoint)
        -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Bn254Scheme;

impl EpochKeyScheme for Bn254Scheme {
    fn epoch_point(&self, epoch_id: &EpochId) -> EpochPoint {
        compute_epoch_point(epoch_id.as_bytes())
    }

    fn verify_share(
        &self,
        share: &EpochSecretKeyShare,
        public_key_share: &EonPublicKeyShare,
        point: &EpochPoint,
    ) -> bool {
        verify_epoch_secret_key_share(share, public_key_share, point)
    }

    fn reconstruct_key(
        &self,
        threshold: u64,
        keyper_indices: &[KeyperIndex],
        shares: &[EpochSecretKeyShare],
    ) -> Result<EpochSecretKey, CryptoError> {
        compute_epoch_secret_key(keyper_indices, shares, threshold)
    }

    fn verify_key(
        &self,
        key: &EpochSecretKey,
        public_key: &EonPublicKey,
        point: &EpochPoint,
    ) -> bool {
        verify_epoch_secret_key(key, public_key, point)
    }
}
