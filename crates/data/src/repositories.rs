// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::DataStore;

/// Root handle the per-domain repository factories hang off.
///
/// Domain crates add extension traits (`impl XRepositoryFactory for Repositories`) that scope
/// the store to their own keys.
#[derive(Clone, Debug)]
pub struct Repositories {
    pub store: DataStore,
}

impl Repositories {
    pub fn new(store: DataStore) -> Self {
        Repositories { store }
    }
}

impl From<DataStore> for Repositories {
    fn from(value: DataStore) -> Self {
        Repositories::new(value)
    }
}

impl From<&DataStore> for Repositories {
    fn from(value: &DataStore) -> Self {
        Repositories::new(value.clone())
    }
}
