// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::Path;

use actix::Actor;
use anyhow::Result;
use keyper_config::{KeyperConfig, StoreKind};
use keyper_data::{DataStore, InMemStore, Shutdown, SledDb, SledStore, StoreAddr};

pub fn get_sled_store(db_file: &Path) -> Result<DataStore> {
    Ok((&SledStore::new(db_file)?).into())
}

pub fn get_in_mem_store() -> DataStore {
    (&InMemStore::new(false).start()).into()
}

pub fn setup_datastore(config: &KeyperConfig) -> Result<DataStore> {
    let store: DataStore = match config.store {
        StoreKind::Sled => get_sled_store(&config.db_path())?,
        StoreKind::InMem => get_in_mem_store(),
    };
    Ok(store)
}

/// Stops the store actor so sled flushes before the process exits.
pub async fn shutdown(store: &DataStore) -> Result<()> {
    match store.get_addr() {
        StoreAddr::Sled(addr) => addr.send(Shutdown).await?,
        StoreAddr::InMem(addr) => addr.send(Shutdown).await?,
    }
    Ok(())
}

pub fn close_all_connections() {
    SledDb::close_all_connections();
}
