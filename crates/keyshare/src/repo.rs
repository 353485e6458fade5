// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use async_trait::async_trait;
use keyper_config::StoreKeys;
use keyper_data::{DataStore, Repositories, Repository};
use keyper_events::{Eon, EpochId, KeyperIndex};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::{DkgResultRecord, KeyperDb, StoredShare};

pub trait KeyperRepositoryFactory {
    fn dkg_result(&self, eon: Eon) -> Repository<DkgResultRecord>;
    fn decryption_key_shares(&self, eon: Eon, epoch: &EpochId) -> DataStore;
    fn decryption_key_share(
        &self,
        eon: Eon,
        epoch: &EpochId,
        sender: KeyperIndex,
        share: &[u8],
    ) -> Repository<StoredShare>;
    fn decryption_key(&self, eon: Eon, epoch: &EpochId) -> Repository<Vec<u8>>;
}

fn share_digest(share: &[u8]) -> String {
    keyper_utils::to_hex(&Sha256::digest(share)[..8])
}

impl KeyperRepositoryFactory for Repositories {
    fn dkg_result(&self, eon: Eon) -> Repository<DkgResultRecord> {
        Repository::new(self.store.scope(StoreKeys::dkg_result(eon)))
    }

    fn decryption_key_shares(&self, eon: Eon, epoch: &EpochId) -> DataStore {
        self.store.scope(StoreKeys::decryption_key_shares(eon, epoch))
    }

    fn decryption_key_share(
        &self,
        eon: Eon,
        epoch: &EpochId,
        sender: KeyperIndex,
        share: &[u8],
    ) -> Repository<StoredShare> {
        Repository::new(self.store.scope(StoreKeys::decryption_key_share(
            eon,
            epoch,
            sender,
            &share_digest(share),
        )))
    }

    fn decryption_key(&self, eon: Eon, epoch: &EpochId) -> Repository<Vec<u8>> {
        Repository::new(self.store.scope(StoreKeys::decryption_key(eon, epoch)))
    }
}

#[async_trait]
impl KeyperDb for Repositories {
    async fn get_dkg_result(&self, eon: Eon) -> Result<Option<DkgResultRecord>> {
        self.dkg_result(eon).read().await
    }

    async fn insert_dkg_result(&self, eon: Eon, record: &DkgResultRecord) -> Result<()> {
        self.dkg_result(eon).write(record).await
    }

    async fn insert_share(
        &self,
        eon: Eon,
        epoch: &EpochId,
        sender: KeyperIndex,
        share: &[u8],
    ) -> Result<()> {
        let record = StoredShare {
            sender,
            share: share.to_vec(),
        };
        self.decryption_key_share(eon, epoch, sender, share)
            .write_if_absent(&record)
            .await?;
        Ok(())
    }

    async fn select_shares(&self, eon: Eon, epoch: &EpochId) -> Result<Vec<StoredShare>> {
        let entries = self.decryption_key_shares(eon, epoch).children_raw().await?;
        Ok(entries
            .into_iter()
            .filter_map(|(name, bytes)| match bincode::deserialize::<StoredShare>(&bytes) {
                Ok(share) => Some(share),
                Err(err) => {
                    warn!(eon, epoch = %epoch, record = %name, "unreadable share record: {err}");
                    None
                }
            })
            .collect())
    }

    async fn exists_key(&self, eon: Eon, epoch: &EpochId) -> Result<bool> {
        self.decryption_key(eon, epoch).has().await
    }

    async fn get_key(&self, eon: Eon, epoch: &EpochId) -> Result<Option<Vec<u8>>> {
        self.decryption_key(eon, epoch).read().await
    }

    async fn insert_key(&self, eon: Eon, epoch: &EpochId, key: &[u8]) -> Result<bool> {
        self.decryption_key(eon, epoch)
            .write_if_absent(&key.to_vec())
            .await
    }
}
