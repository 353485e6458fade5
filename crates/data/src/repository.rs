// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::marker::PhantomData;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

use crate::DataStore;

/// A `DataStore` location holding values of one type.
#[derive(Debug)]
pub struct Repository<S> {
    store: DataStore,
    _p: PhantomData<S>,
}

impl<S> Repository<S> {
    pub fn new(store: DataStore) -> Self {
        Self {
            store,
            _p: PhantomData,
        }
    }
}

impl<S> Clone for Repository<S> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<T> From<Repository<T>> for DataStore {
    fn from(value: Repository<T>) -> Self {
        value.store
    }
}

impl<T> From<&Repository<T>> for DataStore {
    fn from(value: &Repository<T>) -> Self {
        value.store.clone()
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub async fn read(&self) -> Result<Option<T>> {
        self.store.read().await
    }

    pub async fn write(&self, value: &T) -> Result<()> {
        self.store.write(value).await
    }

    /// Writes unless a value is already stored. Returns whether it wrote.
    pub async fn write_if_absent(&self, value: &T) -> Result<bool> {
        self.store.write_if_absent(value).await
    }

    pub async fn has(&self) -> Result<bool> {
        Ok(self.store.read::<T>().await?.is_some())
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }
}
