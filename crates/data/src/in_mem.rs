// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Get, Insert, InsertIfAbsent, KeyValStore, Remove, ScanPrefix, Shutdown};
use actix::{Actor, ActorContext, Handler, Message};
use anyhow::Result;
use std::collections::BTreeMap;

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash)]
#[rtype(result = "Vec<DataOp>")]
pub struct GetLog;

/// A successful mutation, as recorded when capture is on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataOp {
    Insert(Insert),
    Remove(Remove),
}

#[derive(Default)]
pub struct InMemDb {
    db: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl KeyValStore for InMemDb {
    fn insert(&mut self, msg: Insert) -> Result<()> {
        self.db.insert(msg.0, msg.1);
        Ok(())
    }

    fn insert_if_absent(&mut self, msg: InsertIfAbsent) -> Result<bool> {
        if self.db.contains_key(msg.key()) {
            return Ok(false);
        }
        self.db.insert(msg.0, msg.1);
        Ok(true)
    }

    fn remove(&mut self, msg: Remove) -> Result<()> {
        self.db.remove(msg.key());
        Ok(())
    }

    fn get(&self, msg: Get) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(msg.key()).cloned())
    }

    fn scan_prefix(&self, msg: ScanPrefix) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let prefix = msg.prefix();
        Ok(self
            .db
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

pub struct InMemStore {
    db: InMemDb,
    log: Vec<DataOp>,
    capture: bool,
}

impl Actor for InMemStore {
    type Context = actix::Context<Self>;
}

impl InMemStore {
    pub fn new(capture: bool) -> Self {
        Self {
            db: InMemDb::default(),
            capture,
            log: vec![],
        }
    }

    fn record(&mut self, op: DataOp) {
        if self.capture {
            self.log.push(op);
        }
    }
}

impl Handler<Insert> for InMemStore {
    type Result = Result<()>;

    fn handle(&mut self, msg: Insert, _: &mut Self::Context) -> Self::Result {
        self.db.insert(msg.clone())?;
        self.record(DataOp::Insert(msg));
        Ok(())
    }
}

impl Handler<InsertIfAbsent> for InMemStore {
    type Result = Result<bool>;

    fn handle(&mut self, msg: InsertIfAbsent, _: &mut Self::Context) -> Self::Result {
        let inserted = self.db.insert_if_absent(msg.clone())?;
        if inserted {
            self.record(DataOp::Insert(msg.into()));
        }
        Ok(inserted)
    }
}

impl Handler<Remove> for InMemStore {
    type Result = Result<()>;

    fn handle(&mut self, msg: Remove, _: &mut Self::Context) -> Self::Result {
        self.db.remove(msg.clone())?;
        self.record(DataOp::Remove(msg));
        Ok(())
    }
}

impl Handler<Get> for InMemStore {
    type Result = Result<Option<Vec<u8>>>;

    fn handle(&mut self, msg: Get, _: &mut Self::Context) -> Self::Result {
        self.db.get(msg)
    }
}

impl Handler<ScanPrefix> for InMemStore {
    type Result = Result<Vec<(Vec<u8>, Vec<u8>)>>;

    fn handle(&mut self, msg: ScanPrefix, _: &mut Self::Context) -> Self::Result {
        self.db.scan_prefix(msg)
    }
}

impl Handler<GetLog> for InMemStore {
    type Result = Vec<DataOp>;

    fn handle(&mut self, _: GetLog, _: &mut Self::Context) -> Vec<DataOp> {
        self.log.clone()
    }
}

impl Handler<Shutdown> for InMemStore {
    type Result = ();

    fn handle(&mut self, _: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        ctx.stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix::Actor;

    #[actix::test]
    async fn capture_log_records_only_effective_writes() -> Result<()> {
        let addr = InMemStore::new(true).start();
        addr.send(Insert::new("//a", vec![1])).await??;
        assert!(addr.send(InsertIfAbsent::new("//b", vec![2])).await??);
        assert!(!addr.send(InsertIfAbsent::new("//b", vec![3])).await??);
        addr.send(Remove::new("//a")).await??;

        let log = addr.send(GetLog).await?;
        assert_eq!(
            log,
            vec![
                DataOp::Insert(Insert::new("//a", vec![1])),
                DataOp::Insert(Insert::new("//b", vec![2])),
                DataOp::Remove(Remove::new("//a")),
            ]
        );
        assert_eq!(addr.send(Get::new("//b")).await??, Some(vec![2]));
        Ok(())
    }

    #[actix::test]
    async fn scan_prefix_stops_at_the_prefix_boundary() -> Result<()> {
        let addr = InMemStore::new(false).start();
        for key in ["//x/1/b", "//x/1/a", "//x/10/a", "//x/2/a"] {
            addr.send(Insert::new(key, key.as_bytes().to_vec())).await??;
        }
        let keys: Vec<_> = addr
            .send(ScanPrefix::new("//x/1/"))
            .await??
            .into_iter()
            .map(|(k, _)| String::from_utf8(k).unwrap())
            .collect();
        assert_eq!(keys, vec!["//x/1/a", "//x/1/b"]);
        assert!(addr.send(GetLog).await?.is_empty());
        Ok(())
    }
}
