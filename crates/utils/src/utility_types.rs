// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;
use std::{ops::Deref, sync::Arc};

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::formatters::{from_hex, hexf, to_hex};

/// Shared immutable bytes. Serializes as raw bytes for binary formats and as `0x` hex for
/// human readable ones (JSON/YAML).
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ArcBytes(Arc<Vec<u8>>);

impl ArcBytes {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(bytes.into()))
    }

    pub fn extract_bytes(&self) -> Vec<u8> {
        (*self.0).clone()
    }

    pub fn size_bytes(&self) -> usize {
        self.0.len()
    }
}

impl Deref for ArcBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for ArcBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ArcBytes {
    fn from(value: Vec<u8>) -> Self {
        Self::from_bytes(value)
    }
}

impl From<&[u8]> for ArcBytes {
    fn from(value: &[u8]) -> Self {
        Self::from_bytes(value.to_vec())
    }
}

impl fmt::Debug for ArcBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hexf(self, f)
    }
}

impl Serialize for ArcBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&to_hex(&self.0))
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for ArcBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            let bytes = from_hex(&s).map_err(D::Error::custom)?;
            Ok(ArcBytes::from_bytes(bytes))
        } else {
            let vec: Vec<u8> = Vec::deserialize(deserializer)?;
            Ok(ArcBytes(Arc::new(vec)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_hex() {
        let bytes = ArcBytes::from_bytes(vec![0xca, 0xfe]);
        let json = serde_json::to_string(&bytes).unwrap();
        assert_eq!(json, "\"0xcafe\"");
        let back: ArcBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bytes);
    }

    #[test]
    fn bincode_uses_raw_bytes() {
        let bytes = ArcBytes::from_bytes(vec![1, 2, 3]);
        let encoded = bincode::serialize(&bytes).unwrap();
        assert_eq!(encoded, bincode::serialize(&vec![1u8, 2, 3]).unwrap());
        let back: ArcBytes = bincode::deserialize(&encoded).unwrap();
        assert_eq!(back, bytes);
    }
}
