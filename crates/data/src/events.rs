// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::IntoKey;
use actix::Message;
use anyhow::Result;

/// Durable write. Resolves once the backend has accepted the value.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash)]
#[rtype(result = "Result<()>")]
pub struct Insert(pub Vec<u8>, pub Vec<u8>);
impl Insert {
    pub fn new<K: IntoKey>(key: K, value: Vec<u8>) -> Self {
        Self(key.into_key(), value)
    }

    pub fn key(&self) -> &Vec<u8> {
        &self.0
    }

    pub fn value(&self) -> &Vec<u8> {
        &self.1
    }
}

/// Writes only when nothing is stored under the key. Resolves to whether it wrote.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash)]
#[rtype(result = "Result<bool>")]
pub struct InsertIfAbsent(pub Vec<u8>, pub Vec<u8>);
impl InsertIfAbsent {
    pub fn new<K: IntoKey>(key: K, value: Vec<u8>) -> Self {
        Self(key.into_key(), value)
    }

    pub fn key(&self) -> &Vec<u8> {
        &self.0
    }

    pub fn value(&self) -> &Vec<u8> {
        &self.1
    }
}

impl From<InsertIfAbsent> for Insert {
    fn from(value: InsertIfAbsent) -> Self {
        Insert(value.0, value.1)
    }
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash)]
#[rtype(result = "Result<Option<Vec<u8>>>")]
pub struct Get(pub Vec<u8>);
impl Get {
    pub fn new<K: IntoKey>(key: K) -> Self {
        Self(key.into_key())
    }

    pub fn key(&self) -> &Vec<u8> {
        &self.0
    }
}

/// All entries whose key starts with the prefix, in key order.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash)]
#[rtype(result = "Result<Vec<(Vec<u8>, Vec<u8>)>>")]
pub struct ScanPrefix(pub Vec<u8>);
impl ScanPrefix {
    pub fn new<K: IntoKey>(prefix: K) -> Self {
        Self(prefix.into_key())
    }

    pub fn prefix(&self) -> &Vec<u8> {
        &self.0
    }
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash)]
#[rtype(result = "Result<()>")]
pub struct Remove(pub Vec<u8>);
impl Remove {
    pub fn new<K: IntoKey>(key: K) -> Self {
        Self(key.into_key())
    }

    pub fn key(&self) -> &Vec<u8> {
        &self.0
    }
}

/// Flushes and closes the backend, then stops the actor.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct Shutdown;
