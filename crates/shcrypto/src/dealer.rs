// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use ark_bn254::{Fr, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{PrimeField, Zero};
use keyper_events::Eon;
use rand::{CryptoRng, RngCore};
use tracing::info;

use crate::{CryptoError, EonPublicKey, EonPublicKeyShare, EonSecretKeyShare, PureDkgResult};

fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Fr {
    let mut wide = [0u8; 64];
    rng.fill_bytes(&mut wide);
    Fr::from_le_bytes_mod_order(&wide)
}

/// Horner evaluation of `coefficients` at `x`.
fn evaluate(coefficients: &[Fr], x: Fr) -> Fr {
    coefficients
        .iter()
        .rev()
        .fold(Fr::zero(), |acc, c| acc * x + c)
}

/// Trusted dealer producing the DKG results of a whole keyper set from one random polynomial.
///
/// For devnets and tests. Real eons come out of the DKG ceremony.
pub fn deal<R: RngCore + CryptoRng>(
    eon: Eon,
    num_keypers: u64,
    threshold: u64,
    rng: &mut R,
) -> Result<Vec<PureDkgResult>, CryptoError> {
    if num_keypers == 0 || threshold == 0 || threshold > num_keypers {
        return Err(CryptoError::InvalidKeyperSet(format!(
            "cannot deal threshold {} of {}",
            threshold, num_keypers
        )));
    }

    let coefficients: Vec<Fr> = (0..threshold).map(|_| random_scalar(rng)).collect();
    let g2 = G2Affine::generator();
    let public_key = EonPublicKey((g2 * coefficients[0]).into_affine());

    let secret_shares: Vec<Fr> = (0..num_keypers)
        .map(|i| evaluate(&coefficients, Fr::from(i + 1)))
        .collect();
    let public_key_shares: Vec<EonPublicKeyShare> = secret_shares
        .iter()
        .map(|s| EonPublicKeyShare((g2 * s).into_affine()))
        .collect();

    info!(eon, num_keypers, threshold, "dealt eon key material");

    Ok(secret_shares
        .into_iter()
        .enumerate()
        .map(|(keyper, secret)| PureDkgResult {
            eon,
            num_keypers,
            threshold,
            keyper: keyper as u64,
            secret_key_share: EonSecretKeyShare(secret),
            public_key,
            public_key_shares: public_key_shares.clone(),
        })
        .collect())
}
