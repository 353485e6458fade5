// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use keyper_events::{Eon, EpochId, KeyperIndex};
use keyper_shcrypto::CryptoError;
use thiserror::Error;

/// Why an epoch that reached threshold produced no usable key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructionError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("reconstructed key does not verify against the eon public key")]
    KeyMismatch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("share is for eon {got} but the aggregator holds eon {want}")]
    WrongEon { want: Eon, got: Eon },
    #[error("keyper {sender} already contributed a share for epoch {epoch}")]
    DuplicateSender { sender: KeyperIndex, epoch: EpochId },
    #[error("sender {sender} out of range for {num_keypers} keypers")]
    SenderOutOfRange {
        sender: KeyperIndex,
        num_keypers: u64,
    },
    #[error("share from keyper {sender} for epoch {epoch} does not verify")]
    VerificationFailed { sender: KeyperIndex, epoch: EpochId },
    #[error("failed to reconstruct key for epoch {epoch}: {source}")]
    Reconstruction {
        epoch: EpochId,
        source: ReconstructionError,
    },
}
