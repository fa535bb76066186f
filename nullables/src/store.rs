//! Thread-safe in-memory persistence for testing.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use meshmap_store::{NodeDb, SnapshotStore, StoreError};

/// Keeps the last saved snapshot in memory and counts saves.
///
/// Loads and saves can be made to fail to exercise the fatal paths.
#[derive(Debug, Default)]
pub struct NullSnapshotStore {
    snapshot: Mutex<Option<NodeDb>>,
    saves: AtomicUsize,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl NullSnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `db`, as if written by an earlier run.
    pub fn with_snapshot(db: NodeDb) -> Self {
        Self {
            snapshot: Mutex::new(Some(db)),
            ..Self::default()
        }
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The most recently saved snapshot.
    pub fn snapshot(&self) -> Option<NodeDb> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for NullSnapshotStore {
    fn load(&self) -> Result<NodeDb, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("injected load failure")));
        }
        Ok(self.snapshot.lock().unwrap().clone().unwrap_or_default())
    }

    fn save(&self, db: &NodeDb) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("injected write failure")));
        }
        *self.snapshot.lock().unwrap() = Some(db.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshmap_types::{NodeNum, Timestamp};

    #[test]
    fn empty_store_loads_empty_table() {
        let store = NullSnapshotStore::new();
        assert!(store.load().unwrap().is_empty());
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn save_replaces_and_counts() {
        let store = NullSnapshotStore::new();
        let mut db = NodeDb::new();
        db.entry(NodeNum::new(1), "t", Timestamp::new(1));
        store.save(&db).unwrap();
        store.save(&db).unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load().unwrap(), db);
    }

    #[test]
    fn injected_failures_surface_as_io_errors() {
        let store = NullSnapshotStore::new();
        store.fail_saves(true);
        assert!(matches!(store.save(&NodeDb::new()), Err(StoreError::Io(_))));
        assert_eq!(store.save_count(), 0);
        store.fail_loads(true);
        assert!(store.load().is_err());
    }
}
