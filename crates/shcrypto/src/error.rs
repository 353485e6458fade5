// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use keyper_events::KeyperIndex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("could not decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("could not encode {what}: {reason}")]
    Encode { what: &'static str, reason: String },

    #[error("expected exactly {expected} shares for reconstruction, got {actual}")]
    ShareCount { expected: u64, actual: usize },

    #[error("got {indices} keyper indices for {shares} shares")]
    LengthMismatch { indices: usize, shares: usize },

    #[error("keyper index {0} appears more than once")]
    DuplicateIndex(KeyperIndex),

    #[error("invalid keyper set: {0}")]
    InvalidKeyperSet(String),
}
