// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use keyper_events::{Eon, EpochId};
use tokio::sync::OwnedMutexGuard;

type LockTable = HashMap<(Eon, EpochId), Arc<tokio::sync::Mutex<()>>>;

/// In-process mutual exclusion per (eon, epoch).
///
/// Only narrows the window for duplicate key broadcasts. Storage stays correct without it.
#[derive(Clone, Debug, Default)]
pub struct EpochLocks {
    table: Arc<Mutex<LockTable>>,
}

fn table(locks: &Mutex<LockTable>) -> MutexGuard<'_, LockTable> {
    // the table holds no invariant a panicking holder could break
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EpochLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, eon: Eon, epoch: EpochId) -> EpochLockGuard {
        let entry = table(&self.table)
            .entry((eon, epoch))
            .or_default()
            .clone();
        let guard = entry.lock_owned().await;
        EpochLockGuard {
            key: (eon, epoch),
            table: self.table.clone(),
            guard: Some(guard),
        }
    }

    /// Number of (eon, epoch) pairs currently held or waited on.
    pub fn active(&self) -> usize {
        table(&self.table).len()
    }
}

pub struct EpochLockGuard {
    key: (Eon, EpochId),
    table: Arc<Mutex<LockTable>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EpochLockGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut table = table(&self.table);
        if table
            .get(&self.key)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            table.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_epoch_is_serialized_and_entries_are_released() {
        let locks = EpochLocks::new();
        let epoch = EpochId::from_u64(1);

        let first = locks.lock(0, epoch).await;
        let other_epoch = locks.lock(0, EpochId::from_u64(2)).await;
        assert_eq!(locks.active(), 2);

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock(0, epoch).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(first);
        contender.await.unwrap();
        drop(other_epoch);
        assert_eq!(locks.active(), 0);
    }
}
