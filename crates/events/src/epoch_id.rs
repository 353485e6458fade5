// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

use keyper_utils::{from_hex, to_hex};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const EPOCH_ID_LEN: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EpochIdError {
    #[error("epoch id must be {EPOCH_ID_LEN} bytes, got {0}")]
    WrongLength(usize),
    #[error("epoch id is not valid hex: {0}")]
    BadHex(String),
}

/// Fixed size identifier of an epoch within an eon.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpochId([u8; EPOCH_ID_LEN]);

impl EpochId {
    pub const fn new(bytes: [u8; EPOCH_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses the wire representation. Anything other than exactly 32 bytes is rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EpochIdError> {
        let arr: [u8; EPOCH_ID_LEN] = bytes
            .try_into()
            .map_err(|_| EpochIdError::WrongLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self, EpochIdError> {
        let bytes = from_hex(s).map_err(|e| EpochIdError::BadHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Right aligned big endian encoding of a sequence number, handy for block based epochs.
    pub fn from_u64(n: u64) -> Self {
        let mut bytes = [0u8; EPOCH_ID_LEN];
        bytes[EPOCH_ID_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl TryFrom<&[u8]> for EpochId {
    type Error = EpochIdError;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(value)
    }
}

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl fmt::Debug for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpochId({})", self.hex())
    }
}

impl Serialize for EpochId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for EpochId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            EpochId::from_hex(&s).map_err(D::Error::custom)
        } else {
            let bytes = <[u8; EPOCH_ID_LEN]>::deserialize(deserializer)?;
            Ok(EpochId(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_lengths() {
        assert_eq!(
            EpochId::from_slice(&[1, 2, 3]),
            Err(EpochIdError::WrongLength(3))
        );
        assert_eq!(
            EpochId::from_slice(&[0u8; 33]),
            Err(EpochIdError::WrongLength(33))
        );
        assert!(EpochId::from_slice(&[7u8; 32]).is_ok());
    }

    #[test]
    fn from_u64_is_right_aligned() {
        let id = EpochId::from_u64(0x0102);
        assert_eq!(&id.as_bytes()[30..], &[1, 2]);
        assert!(id.as_bytes()[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn serializes_as_hex_for_json() {
        let id = EpochId::from_u64(5);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.hex()));
        assert_eq!(serde_json::from_str::<EpochId>(&json).unwrap(), id);
        let bin = bincode::serialize(&id).unwrap();
        assert_eq!(bin.len(), EPOCH_ID_LEN);
    }
}
