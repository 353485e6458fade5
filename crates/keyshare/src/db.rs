// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use async_trait::async_trait;
use keyper_events::{Eon, EpochId, KeyperIndex};
use serde::{Deserialize, Serialize};

/// What the DKG left behind for an eon. `pure_result` is an encoded `PureDkgResult` and only
/// meaningful when `success` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DkgResultRecord {
    pub success: bool,
    pub pure_result: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredShare {
    pub sender: KeyperIndex,
    pub share: Vec<u8>,
}

/// Storage the ingestion pipeline relies on.
#[async_trait]
pub trait KeyperDb: Send + Sync {
    async fn get_dkg_result(&self, eon: Eon) -> Result<Option<DkgResultRecord>>;

    async fn insert_dkg_result(&self, eon: Eon, record: &DkgResultRecord) -> Result<()>;

    /// Append only. Storing the exact same share twice keeps one copy; differing shares
    /// from one sender are all kept.
    async fn insert_share(
        &self,
        eon: Eon,
        epoch: &EpochId,
        sender: KeyperIndex,
        share: &[u8],
    ) -> Result<()>;

    /// Ordered by sender. Records that cannot be read back are skipped.
    async fn select_shares(&self, eon: Eon, epoch: &EpochId) -> Result<Vec<StoredShare>>;

    async fn exists_key(&self, eon: Eon, epoch: &EpochId) -> Result<bool>;

    async fn get_key(&self, eon: Eon, epoch: &EpochId) -> Result<Option<Vec<u8>>>;

    /// Keeps the first key stored for an epoch. Returns whether this call stored it.
    async fn insert_key(&self, eon: Eon, epoch: &EpochId, key: &[u8]) -> Result<bool>;
}
