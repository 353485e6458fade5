// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::CryptoError;

pub(crate) fn encode<T: CanonicalSerialize>(value: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.compressed_size());
    // Writing into a Vec is infallible.
    let _ = value.serialize_compressed(&mut out);
    out
}

/// Decodes a compressed encoding, checking curve and subgroup membership and rejecting
/// trailing bytes.
pub(crate) fn decode<T: CanonicalDeserialize + CanonicalSerialize>(
    bytes: &[u8],
    what: &'static str,
) -> Result<T, CryptoError> {
    let value = T::deserialize_compressed(bytes).map_err(|e| CryptoError::Decode {
        what,
        reason: e.to_string(),
    })?;
    if value.compressed_size() != bytes.len() {
        return Err(CryptoError::Decode {
            what,
            reason: format!(
                "expected {} bytes, got {}",
                value.compressed_size(),
                bytes.len()
            ),
        });
    }
    Ok(value)
}

/// Serde support through the compressed encoding: raw bytes for bincode, hex for JSON/YAML.
macro_rules! serde_via_bytes {
    ($ty:ident) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let bytes = self.to_bytes();
                if serializer.is_human_readable() {
                    serializer.serialize_str(&keyper_utils::to_hex(&bytes))
                } else {
                    serializer.serialize_bytes(&bytes)
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                use serde::{de::Error, Deserialize};
                let bytes: Vec<u8> = if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    keyper_utils::from_hex(&s).map_err(D::Error::custom)?
                } else {
                    serde_bytes_vec(deserializer)?
                };
                $ty::from_bytes(&bytes).map_err(D::Error::custom)
            }
        }
    };
}

fn serde_bytes_vec<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    struct BytesVisitor;

    impl<'de> serde::de::Visitor<'de> for BytesVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a byte array")
        }

        fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(b) = seq.next_element::<u8>()? {
                out.push(b);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_byte_buf(BytesVisitor)
}

/// This keyper's share of the eon secret. Wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct EonSecretKeyShare(pub(crate) Fr);

impl EonSecretKeyShare {
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self(decode(bytes, "eon secret key share")?))
    }
}

impl Zeroize for EonSecretKeyShare {
    fn zeroize(&mut self) {
        self.0 .0 .0.zeroize();
    }
}

impl Drop for EonSecretKeyShare {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for EonSecretKeyShare {}

impl fmt::Debug for EonSecretKeyShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EonSecretKeyShare(<redacted>)")
    }
}

serde_via_bytes!(EonSecretKeyShare);

/// `sk · g2`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EonPublicKey(pub(crate) G2Affine);

/// `sk_i · g2`, one per keyper, indexed by keyper index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EonPublicKeyShare(pub(crate) G2Affine);

/// The epoch id hashed onto G1.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpochPoint(pub(crate) G1Affine);

/// `sk_i · P(epoch)`, what keypers gossip.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpochSecretKeyShare(pub(crate) G1Affine);

/// `sk · P(epoch)`, the reconstructed decryption key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpochSecretKey(pub(crate) G1Affine);

macro_rules! point_type {
    ($ty:ident, $what:literal) => {
        impl $ty {
            pub fn to_bytes(&self) -> Vec<u8> {
                encode(&self.0)
            }

            pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
                Ok(Self(decode(bytes, $what)?))
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", stringify!($ty))?;
                keyper_utils::hexf(&self.to_bytes(), f)?;
                write!(f, ")")
            }
        }

        serde_via_bytes!($ty);
    };
}

point_type!(EonPublicKey, "eon public key");
point_type!(EonPublicKeyShare, "eon public key share");
point_type!(EpochPoint, "epoch point");
point_type!(EpochSecretKeyShare, "epoch secret key share");
point_type!(EpochSecretKey, "epoch secret key");

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::AffineRepr;
    use ark_ff::UniformRand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn share_bytes_roundtrip_and_reject_garbage() {
        let share = EpochSecretKeyShare(G1Affine::generator());
        let bytes = share.to_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(EpochSecretKeyShare::from_bytes(&bytes).unwrap(), share);

        let mut long = bytes.clone();
        long.push(0);
        assert!(EpochSecretKeyShare::from_bytes(&long).is_err());
        assert!(EpochSecretKeyShare::from_bytes(&[0xff; 32]).is_err());
        assert!(EpochSecretKeyShare::from_bytes(&[]).is_err());
    }

    #[test]
    fn secret_share_is_redacted_and_zeroized() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut sk = EonSecretKeyShare(Fr::rand(&mut rng));
        assert_eq!(format!("{:?}", sk), "EonSecretKeyShare(<redacted>)");
        sk.zeroize();
        assert_eq!(sk.0, Fr::from(0u64));
    }

    #[test]
    fn json_uses_hex_and_bincode_uses_bytes() {
        let pk = EonPublicKeyShare(G2Affine::generator());
        let json = serde_json::to_string(&pk).unwrap();
        assert!(json.starts_with("\"0x"));
        assert_eq!(serde_json::from_str::<EonPublicKeyShare>(&json).unwrap(), pk);

        let bin = bincode::serialize(&pk).unwrap();
        assert_eq!(bincode::deserialize::<EonPublicKeyShare>(&bin).unwrap(), pk);
    }
}
