// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::collections::HashSet;

use ark_bn254::{Bn254, Fq, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{Field, One, PrimeField, Zero};
use keyper_events::KeyperIndex;
use sha2::{Digest, Sha256};

use crate::{
    CryptoError, EonPublicKey, EonPublicKeyShare, EonSecretKeyShare, EpochPoint, EpochSecretKey,
    EpochSecretKeyShare,
};

const EPOCH_POINT_DST: &[u8] = b"KEYPER_EPOCH_ID_BN254_G1";

/// Hashes an epoch id onto G1 by try-and-increment.
///
/// BN254 G1 has cofactor 1 so every point on the curve is in the prime order subgroup.
pub fn compute_epoch_point(epoch_id: &[u8]) -> EpochPoint {
    let mut counter: u32 = 0;
    loop {
        let digest = Sha256::new()
            .chain_update(EPOCH_POINT_DST)
            .chain_update(counter.to_be_bytes())
            .chain_update(epoch_id)
            .finalize();
        let x = Fq::from_be_bytes_mod_order(&digest);
        if let Some(point) = G1Affine::get_point_from_x_unchecked(x, digest[0] & 1 == 1) {
            return EpochPoint(point);
        }
        counter = counter.wrapping_add(1);
    }
}

pub fn compute_epoch_secret_key_share(
    secret_key_share: &EonSecretKeyShare,
    point: &EpochPoint,
) -> EpochSecretKeyShare {
    EpochSecretKeyShare((point.0 * secret_key_share.0).into_affine())
}

/// `e(share, g2) == e(P(epoch), pk_i)`
pub fn verify_epoch_secret_key_share(
    share: &EpochSecretKeyShare,
    public_key_share: &EonPublicKeyShare,
    point: &EpochPoint,
) -> bool {
    Bn254::pairing(share.0, G2Affine::generator()) == Bn254::pairing(point.0, public_key_share.0)
}

/// `e(key, g2) == e(P(epoch), pk)`
pub fn verify_epoch_secret_key(
    key: &EpochSecretKey,
    public_key: &EonPublicKey,
    point: &EpochPoint,
) -> bool {
    Bn254::pairing(key.0, G2Affine::generator()) == Bn254::pairing(point.0, public_key.0)
}

/// Lagrange coefficients at zero for the evaluation points `index + 1`.
pub(crate) fn lagrange_coefficients(indices: &[KeyperIndex]) -> Result<Vec<Fr>, CryptoError> {
    let mut seen = HashSet::with_capacity(indices.len());
    for index in indices {
        if !seen.insert(*index) {
            return Err(CryptoError::DuplicateIndex(*index));
        }
    }

    let xs: Vec<Fr> = indices.iter().map(|i| Fr::from(*i) + Fr::one()).collect();
    xs.iter()
        .enumerate()
        .map(|(i, xi)| {
            let mut numerator = Fr::one();
            let mut denominator = Fr::one();
            for (j, xj) in xs.iter().enumerate() {
                if i == j {
                    continue;
                }
                numerator *= xj;
                denominator *= *xj - xi;
            }
            let inverse = denominator
                .inverse()
                .ok_or(CryptoError::DuplicateIndex(indices[i]))?;
            Ok(numerator * inverse)
        })
        .collect()
}

/// Interpolates exactly `threshold` shares from distinct keypers into the epoch secret key.
pub fn compute_epoch_secret_key(
    keyper_indices: &[KeyperIndex],
    shares: &[EpochSecretKeyShare],
    threshold: u64,
) -> Result<EpochSecretKey, CryptoError> {
    if keyper_indices.len() != shares.len() {
        return Err(CryptoError::LengthMismatch {
            indices: keyper_indices.len(),
            shares: shares.len(),
        });
    }
    if threshold == 0 || shares.len() as u64 != threshold {
        return Err(CryptoError::ShareCount {
            expected: threshold,
            actual: shares.len(),
        });
    }

    let coefficients = lagrange_coefficients(keyper_indices)?;
    let mut key = G1Projective::zero();
    for (share, lambda) in shares.iter().zip(coefficients) {
        key += share.0 * lambda;
    }
    Ok(EpochSecretKey(key.into_affine()))
}
