// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use keyper_events::{Eon, EpochId, KeyperIndex};
use serde::{Deserialize, Serialize};

use crate::{
    compute_epoch_point, compute_epoch_secret_key_share, CryptoError, EonPublicKey,
    EonPublicKeyShare, EonSecretKeyShare, EpochSecretKeyShare,
};

/// Outcome of a successful DKG for one keyper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PureDkgResult {
    pub eon: Eon,
    pub num_keypers: u64,
    pub threshold: u64,
    pub keyper: KeyperIndex,
    pub secret_key_share: EonSecretKeyShare,
    pub public_key: EonPublicKey,
    pub public_key_shares: Vec<EonPublicKeyShare>,
}

impl PureDkgResult {
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.num_keypers == 0 {
            return Err(CryptoError::InvalidKeyperSet("no keypers".into()));
        }
        if self.threshold == 0 || self.threshold > self.num_keypers {
            return Err(CryptoError::InvalidKeyperSet(format!(
                "threshold {} out of range for {} keypers",
                self.threshold, self.num_keypers
            )));
        }
        if self.keyper >= self.num_keypers {
            return Err(CryptoError::InvalidKeyperSet(format!(
                "keyper index {} out of range for {} keypers",
                self.keyper, self.num_keypers
            )));
        }
        if self.public_key_shares.len() as u64 != self.num_keypers {
            return Err(CryptoError::InvalidKeyperSet(format!(
                "{} public key shares for {} keypers",
                self.public_key_shares.len(),
                self.num_keypers
            )));
        }
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>, CryptoError> {
        bincode::serialize(self).map_err(|e| CryptoError::Encode {
            what: "pure dkg result",
            reason: e.to_string(),
        })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CryptoError> {
        let result: Self = bincode::deserialize(bytes).map_err(|e| CryptoError::Decode {
            what: "pure dkg result",
            reason: e.to_string(),
        })?;
        result.validate()?;
        Ok(result)
    }

    /// This keyper's own share for an epoch.
    pub fn compute_epoch_secret_key_share(&self, epoch_id: &EpochId) -> EpochSecretKeyShare {
        let point = compute_epoch_point(epoch_id.as_bytes());
        compute_epoch_secret_key_share(&self.secret_key_share, &point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn encode_decode_keeps_everything() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let result = deal(3, 4, 2, &mut rng).unwrap().remove(2);
        let decoded = PureDkgResult::decode(&result.encode().unwrap()).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn decode_rejects_inconsistent_keyper_sets() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut result = deal(3, 4, 2, &mut rng).unwrap().remove(0);
        result.public_key_shares.pop();
        let err = PureDkgResult::decode(&result.encode().unwrap()).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyperSet(_)));

        assert!(PureDkgResult::decode(&[1, 2, 3]).is_err());
    }
}
