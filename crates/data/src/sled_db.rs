// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use sled::Tree;
use std::path::Path;

use crate::{
    sled_utils::{clear_all_caches, get_or_open_db_tree},
    Get, Insert, InsertIfAbsent, KeyValStore, Remove, ScanPrefix,
};

pub struct SledDb {
    db: Tree,
}

impl SledDb {
    pub fn new(path: &Path, tree: &str) -> Result<Self> {
        let db = get_or_open_db_tree(path, tree)?;
        Ok(Self { db })
    }

    pub fn close_all_connections() {
        clear_all_caches()
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush().context("Could not flush db")?;
        Ok(())
    }
}

impl KeyValStore for SledDb {
    fn insert(&mut self, msg: Insert) -> Result<()> {
        self.db
            .insert(msg.key(), msg.value().to_vec())
            .context("Could not insert data into db")?;

        Ok(())
    }

    fn insert_if_absent(&mut self, msg: InsertIfAbsent) -> Result<bool> {
        let swapped = self
            .db
            .compare_and_swap(msg.key(), None as Option<&[u8]>, Some(msg.value().to_vec()))
            .context("Could not insert data into db")?;
        Ok(swapped.is_ok())
    }

    fn remove(&mut self, msg: Remove) -> Result<()> {
        self.db
            .remove(msg.key())
            .context("Could not remove data from db")?;
        Ok(())
    }

    fn get(&self, msg: Get) -> Result<Option<Vec<u8>>> {
        let key = msg.key();
        let res = self
            .db
            .get(key)
            .with_context(|| format!("Failed to fetch {}", String::from_utf8_lossy(key)))?;

        Ok(res.map(|v| v.to_vec()))
    }

    fn scan_prefix(&self, msg: ScanPrefix) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.db
            .scan_prefix(msg.prefix())
            .map(|entry| {
                let (k, v) = entry.with_context(|| {
                    format!("Failed to scan {}", String::from_utf8_lossy(msg.prefix()))
                })?;
                Ok((k.to_vec(), v.to_vec()))
            })
            .collect()
    }
}
