// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use actix::{Actor, Addr};
use anyhow::Result;
use keyper_data::{DataOp, DataStore, GetLog, InMemStore, Repositories};

/// Capturing in-memory store wrapped as the repositories the handlers use.
pub struct TestStore {
    pub addr: Addr<InMemStore>,
    pub repositories: Arc<Repositories>,
}

impl TestStore {
    /// Must be called inside an actix system.
    pub fn start() -> Self {
        let addr = InMemStore::new(true).start();
        let repositories = Arc::new(Repositories::new(DataStore::from(&addr)));
        Self { addr, repositories }
    }

    pub async fn log(&self) -> Result<Vec<DataOp>> {
        Ok(self.addr.send(GetLog).await?)
    }
}
