// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;

use crate::{Get, Insert, InsertIfAbsent, Remove, ScanPrefix};

/// Synchronous key value backend wrapped by the store actors.
pub trait KeyValStore {
    fn insert(&mut self, msg: Insert) -> Result<()>;
    /// Atomic with respect to other writers of the same key.
    fn insert_if_absent(&mut self, msg: InsertIfAbsent) -> Result<bool>;
    fn remove(&mut self, msg: Remove) -> Result<()>;
    fn get(&self, msg: Get) -> Result<Option<Vec<u8>>>;
    fn scan_prefix(&self, msg: ScanPrefix) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}
