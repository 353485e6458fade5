// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Get, Insert, InsertIfAbsent, KeyValStore, Remove, ScanPrefix, Shutdown, SledDb};
use actix::{Actor, ActorContext, Addr, Handler};
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::{error, info};

pub struct SledStore {
    db: Option<SledDb>,
}

impl Actor for SledStore {
    type Context = actix::Context<Self>;

    fn stopped(&mut self, _: &mut Self::Context) {
        if let Some(db) = self.db.take() {
            if let Err(err) = db.flush() {
                error!("{err:?}");
            }
        }
    }
}

impl SledStore {
    pub fn new(path: &Path) -> Result<Addr<Self>> {
        info!("Starting SledStore with {:?}", path);
        let db = SledDb::new(path, "datastore")?;
        Ok(Self { db: Some(db) }.start())
    }

    fn db(&mut self) -> Result<&mut SledDb> {
        self.db
            .as_mut()
            .ok_or_else(|| anyhow!("Attempt to use a closed db"))
    }
}

impl Handler<Insert> for SledStore {
    type Result = Result<()>;

    fn handle(&mut self, msg: Insert, _: &mut Self::Context) -> Self::Result {
        self.db()?.insert(msg)
    }
}

impl Handler<InsertIfAbsent> for SledStore {
    type Result = Result<bool>;

    fn handle(&mut self, msg: InsertIfAbsent, _: &mut Self::Context) -> Self::Result {
        let db = self.db()?;
        let inserted = db.insert_if_absent(msg)?;
        // keys written this way are final, make them survive a crash
        if inserted {
            db.flush()?;
        }
        Ok(inserted)
    }
}

impl Handler<Remove> for SledStore {
    type Result = Result<()>;

    fn handle(&mut self, msg: Remove, _: &mut Self::Context) -> Self::Result {
        self.db()?.remove(msg)
    }
}

impl Handler<Get> for SledStore {
    type Result = Result<Option<Vec<u8>>>;

    fn handle(&mut self, msg: Get, _: &mut Self::Context) -> Self::Result {
        self.db()?.get(msg)
    }
}

impl Handler<ScanPrefix> for SledStore {
    type Result = Result<Vec<(Vec<u8>, Vec<u8>)>>;

    fn handle(&mut self, msg: ScanPrefix, _: &mut Self::Context) -> Self::Result {
        self.db()?.scan_prefix(msg)
    }
}

impl Handler<Shutdown> for SledStore {
    type Result = ();

    fn handle(&mut self, _: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        ctx.stop()
    }
}
