// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use derivative::Derivative;
use keyper_events::{Eon, KeyperIndex};
use keyper_shcrypto::{
    Bn254Scheme, EonPublicKey, EonPublicKeyShare, EonSecretKeyShare, EpochKeyScheme,
    PureDkgResult,
};

use crate::AggregationError;

/// Read-only key material of one eon together with the primitive used on it.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct EonContext {
    eon: Eon,
    num_keypers: u64,
    threshold: u64,
    keyper: KeyperIndex,
    secret_key_share: EonSecretKeyShare,
    public_key: EonPublicKey,
    public_key_shares: Vec<EonPublicKeyShare>,
    #[derivative(Debug = "ignore")]
    scheme: Arc<dyn EpochKeyScheme>,
}

impl EonContext {
    pub fn new(result: PureDkgResult, scheme: Arc<dyn EpochKeyScheme>) -> Self {
        Self {
            eon: result.eon,
            num_keypers: result.num_keypers,
            threshold: result.threshold,
            keyper: result.keyper,
            secret_key_share: result.secret_key_share,
            public_key: result.public_key,
            public_key_shares: result.public_key_shares,
            scheme,
        }
    }

    pub fn eon(&self) -> Eon {
        self.eon
    }

    pub fn num_keypers(&self) -> u64 {
        self.num_keypers
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn keyper(&self) -> KeyperIndex {
        self.keyper
    }

    pub fn secret_key_share(&self) -> &EonSecretKeyShare {
        &self.secret_key_share
    }

    pub fn public_key(&self) -> &EonPublicKey {
        &self.public_key
    }

    pub fn public_key_share(&self, sender: KeyperIndex) -> Result<&EonPublicKeyShare, AggregationError> {
        usize::try_from(sender)
            .ok()
            .and_then(|i| self.public_key_shares.get(i))
            .ok_or(AggregationError::SenderOutOfRange {
                sender,
                num_keypers: self.num_keypers,
            })
    }

    pub fn scheme(&self) -> &dyn EpochKeyScheme {
        self.scheme.as_ref()
    }
}

impl From<PureDkgResult> for EonContext {
    fn from(result: PureDkgResult) -> Self {
        Self::new(result, Arc::new(Bn254Scheme))
    }
}
