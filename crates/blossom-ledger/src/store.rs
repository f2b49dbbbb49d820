//! # Versioned Key-Value Store
//!
//! [`MemoryLedger`] is a thread-safe, cloneable map from string keys to byte
//! values. Every key carries the version of the commit that last wrote it;
//! deletes leave a tombstone with the deleting commit's version, so a reader
//! that saw "absent" still notices a create-then-delete in between.
//!
//! The lock is a `parking_lot::RwLock` and is only held for the duration of
//! a single read or a single commit.
//!
//! ## Snapshots
//!
//! [`MemoryLedger::save`] and [`MemoryLedger::open`] persist the whole state
//! as one JSON document:
//!
//! ```json
//! { "sequence": 3, "entries": { "license:l1": { "version": 2, "value": "{...}" } } }
//! ```
//!
//! Values must be UTF-8 to be snapshotted. Every record Blossom writes is JSON.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;

use blossom_core::LedgerError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Key-value access for contract operations.
///
/// Implemented by [`Transaction`]; every method may record what it read.
pub trait KvStore {
    /// The value at `key`, if any.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write `value` at `key`.
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Remove `key`. Removing an absent key is a no-op.
    fn delete(&mut self, key: &str) -> Result<(), LedgerError>;

    /// Every live key in `[start, end)`, sorted, with its value.
    fn range_scan(&mut self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Entry {
    pub(crate) version: u64,
    /// `None` marks a tombstone.
    pub(crate) value: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct LedgerState {
    /// Version of the last commit.
    pub(crate) sequence: u64,
    pub(crate) entries: BTreeMap<String, Entry>,
}

impl LedgerState {
    pub(crate) fn version(&self, key: &str) -> u64 {
        self.entries.get(key).map_or(0, |e| e.version)
    }
}

/// In-memory versioned ledger. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    pub(crate) state: Arc<RwLock<LedgerState>>,
}

impl MemoryLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transaction against this ledger.
    pub fn begin(&self) -> Transaction {
        Transaction::new(self.clone())
    }

    /// Committed value at `key`, bypassing any transaction.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .entries
            .get(key)
            .and_then(|e| e.value.clone())
            .map(String::into_bytes)
    }

    /// Version of the commit that last wrote `key` (0 if never written).
    pub fn version(&self, key: &str) -> u64 {
        self.state.read().version(key)
    }

    /// Version of the last commit.
    pub fn sequence(&self) -> u64 {
        self.state.read().sequence
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .entries
            .values()
            .filter(|e| e.value.is_some())
            .count()
    }

    /// Whether no live keys exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entries in `[start, end)` with their versions.
    pub(crate) fn scan(&self, start: &str, end: &str) -> Vec<(String, u64, Vec<u8>)> {
        if start >= end {
            return Vec::new();
        }
        self.state
            .read()
            .entries
            .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
            .filter_map(|(k, e)| {
                e.value
                    .as_ref()
                    .map(|v| (k.clone(), e.version, v.clone().into_bytes()))
            })
            .collect()
    }

    /// Committed value and version at `key`.
    pub(crate) fn read_versioned(&self, key: &str) -> (u64, Option<Vec<u8>>) {
        let state = self.state.read();
        match state.entries.get(key) {
            Some(e) => (e.version, e.value.clone().map(String::into_bytes)),
            None => (0, None),
        }
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Load a snapshot from `path`, or start empty if the file does not
    /// exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let bytes = std::fs::read(path)
            .map_err(|e| LedgerError::Storage(format!("reading {}: {e}", path.display())))?;
        let state: LedgerState = serde_json::from_slice(&bytes)
            .map_err(|e| LedgerError::Storage(format!("parsing {}: {e}", path.display())))?;
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Write a snapshot to `path`, replacing it atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        let path = path.as_ref();
        let json = {
            let state = self.state.read();
            serde_json::to_vec_pretty(&*state)
                .map_err(|e| LedgerError::Storage(format!("encoding snapshot: {e}")))?
        };
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| LedgerError::Storage(format!("writing {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| LedgerError::Storage(format!("replacing {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "ledger snapshot saved");
        Ok(())
    }
}

pub(crate) fn check_key(key: &str) -> Result<(), LedgerError> {
    if key.is_empty() {
        Err(LedgerError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(pairs: &[(&str, &str)]) -> MemoryLedger {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        for (k, v) in pairs {
            tx.put(k, v.as_bytes().to_vec()).unwrap();
        }
        tx.commit().unwrap();
        ledger
    }

    #[test]
    fn clones_share_state() {
        let ledger = committed(&[("a", "1")]);
        let other = ledger.clone();
        assert_eq!(other.get("a"), Some(b"1".to_vec()));
        assert_eq!(other.version("a"), 1);
        assert_eq!(other.sequence(), 1);
    }

    #[test]
    fn scan_is_half_open_and_sorted() {
        let ledger = committed(&[("license:b", "2"), ("license:a", "1"), ("licensf", "x")]);
        let keys: Vec<_> = ledger
            .scan("license:", "license;")
            .into_iter()
            .map(|(k, _, _)| k)
            .collect();
        assert_eq!(keys, vec!["license:a", "license:b"]);
        assert!(ledger.scan("z", "a").is_empty());
    }

    #[test]
    fn deletes_leave_versioned_tombstones() {
        let ledger = committed(&[("a", "1")]);
        let mut tx = ledger.begin();
        tx.delete("a").unwrap();
        tx.commit().unwrap();
        assert_eq!(ledger.get("a"), None);
        assert_eq!(ledger.version("a"), 2);
        assert!(ledger.is_empty());
    }

    #[test]
    fn snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let ledger = committed(&[("agency:a1", "{\"name\":\"a1\"}")]);
        ledger.save(&path).unwrap();

        let reopened = MemoryLedger::open(&path).unwrap();
        assert_eq!(reopened.get("agency:a1"), ledger.get("agency:a1"));
        assert_eq!(reopened.sequence(), 1);
    }

    #[test]
    fn open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = MemoryLedger::open(dir.path().join("absent.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn open_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            MemoryLedger::open(&path),
            Err(LedgerError::Storage(_))
        ));
    }
}
