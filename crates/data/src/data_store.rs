// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::borrow::Cow;

use crate::{Get, Insert, InsertIfAbsent, Remove, ScanPrefix};
use crate::{InMemStore, IntoKey, SledStore};
use actix::{Addr, Recipient};
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Clone, Debug)]
pub enum StoreAddr {
    InMem(Addr<InMemStore>),
    Sled(Addr<SledStore>),
}

impl StoreAddr {
    /// The in-memory actor, used by tests to read its capture log.
    pub fn to_maybe_in_mem(&self) -> Option<&Addr<InMemStore>> {
        match self {
            StoreAddr::InMem(ref store) => Some(store),
            _ => None,
        }
    }
}

/// Proxy for the KV store actor.
/// DataStore is scopable
#[derive(Clone, Debug)]
pub struct DataStore {
    scope: Vec<u8>,
    addr: StoreAddr,
    get: Recipient<Get>,
    insert: Recipient<Insert>,
    insert_if_absent: Recipient<InsertIfAbsent>,
    scan: Recipient<ScanPrefix>,
    remove: Recipient<Remove>,
}

impl DataStore {
    /// Read data at the scope location
    pub async fn read<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let Some(bytes) = self.get.send(Get::new(&self.scope)).await?? else {
            return Ok(None);
        };
        let value = bincode::deserialize(&bytes)
            .with_context(|| format!("Could not deserialize value at {}", self.get_scope()))?;
        Ok(Some(value))
    }

    /// Writes data to the scope location and waits for the backend to accept it
    pub async fn write<T: Serialize>(&self, value: &T) -> Result<()> {
        let msg = Insert::new(&self.scope, self.serialize(value)?);
        self.insert.send(msg).await??;
        Ok(())
    }

    /// Writes data to the scope location unless something is already there.
    /// Returns whether the write happened.
    pub async fn write_if_absent<T: Serialize>(&self, value: &T) -> Result<bool> {
        let msg = InsertIfAbsent::new(&self.scope, self.serialize(value)?);
        Ok(self.insert_if_absent.send(msg).await??)
    }

    /// Every entry stored strictly below the scope, in key order, with keys relative to it.
    pub async fn children<T: DeserializeOwned>(&self) -> Result<Vec<(String, T)>> {
        let mut prefix = self.scope.clone();
        prefix.push(b'/');
        let entries = self.scan.send(ScanPrefix::new(&prefix)).await??;
        entries
            .into_iter()
            .map(|(key, bytes)| {
                let name = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
                let value = bincode::deserialize(&bytes)
                    .with_context(|| format!("Could not deserialize value at {}", name))?;
                Ok((name, value))
            })
            .collect()
    }

    /// Raw bytes of every entry below the scope, for callers that decode leniently.
    pub async fn children_raw(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut prefix = self.scope.clone();
        prefix.push(b'/');
        let entries = self.scan.send(ScanPrefix::new(&prefix)).await??;
        Ok(entries
            .into_iter()
            .map(|(key, bytes)| {
                (
                    String::from_utf8_lossy(&key[prefix.len()..]).into_owned(),
                    bytes,
                )
            })
            .collect())
    }

    /// Removes data from the scope location
    pub async fn clear(&self) -> Result<()> {
        self.remove.send(Remove::new(&self.scope)).await??;
        Ok(())
    }

    /// Get the scope as a string
    pub fn get_scope(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.scope)
    }

    /// Get a reference to the addr enum
    pub fn get_addr(&self) -> &StoreAddr {
        &self.addr
    }

    /// Changes the scope for the data store.
    /// Note that if the scope does not start with a slash one is appended.
    /// ```
    /// use keyper_data::DataStore;
    /// use keyper_data::InMemStore;
    /// use actix::Actor;
    ///
    /// #[actix::main]
    /// async fn main() {
    ///   let addr = InMemStore::new(false).start();
    ///   let store = DataStore::from(&addr);
    ///   assert_eq!(store.base("//foo")
    ///     .scope("bar")
    ///     .scope("/baz")
    ///     .get_scope(), "//foo/bar/baz");
    /// }
    /// ```
    pub fn scope<K: IntoKey>(&self, key: K) -> Self {
        let mut scope = self.scope.clone();
        let encoded_key = key.into_key();
        if !encoded_key.starts_with(b"/") {
            scope.push(b'/');
        }
        scope.extend(encoded_key);
        Self {
            scope,
            ..self.clone()
        }
    }

    /// Same store, with `key` as the absolute scope.
    pub fn base<K: IntoKey>(&self, key: K) -> Self {
        Self {
            scope: key.into_key(),
            ..self.clone()
        }
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        bincode::serialize(value)
            .with_context(|| format!("Could not serialize value passed to {}", self.get_scope()))
    }
}

impl From<&Addr<SledStore>> for DataStore {
    fn from(addr: &Addr<SledStore>) -> Self {
        Self {
            addr: StoreAddr::Sled(addr.clone()),
            get: addr.clone().recipient(),
            insert: addr.clone().recipient(),
            insert_if_absent: addr.clone().recipient(),
            scan: addr.clone().recipient(),
            remove: addr.clone().recipient(),
            scope: vec![],
        }
    }
}

impl From<&Addr<InMemStore>> for DataStore {
    fn from(addr: &Addr<InMemStore>) -> Self {
        Self {
            addr: StoreAddr::InMem(addr.clone()),
            get: addr.clone().recipient(),
            insert: addr.clone().recipient(),
            insert_if_absent: addr.clone().recipient(),
            scan: addr.clone().recipient(),
            remove: addr.clone().recipient(),
            scope: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix::Actor;
    use tempfile::tempdir;

    async fn exercise(store: DataStore) -> Result<()> {
        let root = store.base("//things");
        root.scope("1/a").write(&10u64).await?;
        root.scope("1/b").write(&11u64).await?;
        root.scope("2/a").write(&20u64).await?;

        assert_eq!(root.scope("1/a").read::<u64>().await?, Some(10));
        assert_eq!(root.scope("3").read::<u64>().await?, None);

        let children = root.scope("1").children::<u64>().await?;
        assert_eq!(
            children,
            vec![("a".to_string(), 10), ("b".to_string(), 11)]
        );

        assert!(!root.scope("1/a").write_if_absent(&99u64).await?);
        assert!(root.scope("1/c").write_if_absent(&12u64).await?);
        assert_eq!(root.scope("1/a").read::<u64>().await?, Some(10));

        root.scope("2/a").clear().await?;
        assert!(root.scope("2").children::<u64>().await?.is_empty());
        Ok(())
    }

    #[actix::test]
    async fn in_mem_store_behaves() -> Result<()> {
        exercise(DataStore::from(&InMemStore::new(false).start())).await
    }

    #[actix::test]
    async fn sled_store_behaves() -> Result<()> {
        let dir = tempdir()?;
        let addr = SledStore::new(&dir.path().join("db"))?;
        exercise(DataStore::from(&addr)).await
    }
}
