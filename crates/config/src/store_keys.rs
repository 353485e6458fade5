// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use keyper_events::{Eon, EpochId, KeyperIndex};

/// Where each record lives in the store.
pub struct StoreKeys;

impl StoreKeys {
    pub fn dkg_result(eon: Eon) -> String {
        format!("//dkg_result/{eon}")
    }

    /// Parent of every share stored for one epoch. Children sort by sender.
    pub fn decryption_key_shares(eon: Eon, epoch: &EpochId) -> String {
        format!("//decryption_key_share/{eon}/{}", epoch.hex())
    }

    pub fn decryption_key_share(eon: Eon, epoch: &EpochId, sender: KeyperIndex, digest: &str) -> String {
        format!(
            "{}/{sender:020}/{digest}",
            Self::decryption_key_shares(eon, epoch)
        )
    }

    pub fn decryption_key(eon: Eon, epoch: &EpochId) -> String {
        format!("//decryption_key/{eon}/{}", epoch.hex())
    }
}
