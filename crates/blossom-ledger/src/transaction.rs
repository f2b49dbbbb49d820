//! # MVCC Transaction
//!
//! One request runs in one [`Transaction`]. Reads go to the ledger (or to
//! the transaction's own buffered writes) and record the version observed.
//! Writes and deletes are buffered. [`Transaction::commit`] takes the ledger
//! write lock, re-checks every recorded version, and either applies the
//! whole write set under a new commit version or fails with
//! [`LedgerError::MvccConflict`] and applies nothing.
//!
//! A transaction that is dropped without committing leaves no trace.
//!
//! Range scans record the versions of the keys they returned. Keys inserted
//! into a scanned range by a concurrent commit are not detected.

use std::collections::BTreeMap;

use blossom_core::LedgerError;

use crate::store::{check_key, Entry, KvStore, MemoryLedger};

/// A buffered read-write transaction over a [`MemoryLedger`].
#[derive(Debug)]
pub struct Transaction {
    ledger: MemoryLedger,
    /// Key → version observed (0 = absent).
    reads: BTreeMap<String, u64>,
    /// Key → new value (`None` = delete).
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl Transaction {
    pub(crate) fn new(ledger: MemoryLedger) -> Self {
        Self {
            ledger,
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Whether the transaction has buffered any write or delete.
    pub fn is_dirty(&self) -> bool {
        !self.writes.is_empty()
    }

    fn record_read(&mut self, key: &str, version: u64) {
        // The first observation is the one that must still hold at commit.
        self.reads.entry(key.to_string()).or_insert(version);
    }

    /// Validate the read set and apply the write set. Returns the commit
    /// version, or the ledger's current sequence for a read-only
    /// transaction.
    pub fn commit(self) -> Result<u64, LedgerError> {
        let mut state = self.ledger.state.write();

        for (key, &read) in &self.reads {
            let current = state.version(key);
            if current != read {
                tracing::debug!(key, read, current, "mvcc conflict");
                return Err(LedgerError::MvccConflict {
                    key: key.clone(),
                    read,
                    current,
                });
            }
        }

        if self.writes.is_empty() {
            return Ok(state.sequence);
        }

        let version = state.sequence + 1;
        let mut encoded = Vec::with_capacity(self.writes.len());
        for (key, value) in self.writes {
            let value = match value {
                Some(bytes) => Some(String::from_utf8(bytes).map_err(|_| {
                    LedgerError::Storage(format!("value for key {key} is not UTF-8"))
                })?),
                None => None,
            };
            encoded.push((key, value));
        }

        let count = encoded.len();
        for (key, value) in encoded {
            state.entries.insert(key, Entry { version, value });
        }
        state.sequence = version;
        tracing::debug!(version, keys = count, "transaction committed");
        Ok(version)
    }
}

impl KvStore for Transaction {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        check_key(key)?;
        if let Some(buffered) = self.writes.get(key) {
            return Ok(buffered.clone());
        }
        let (version, value) = self.ledger.read_versioned(key);
        self.record_read(key, version);
        Ok(value)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        check_key(key)?;
        self.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), LedgerError> {
        check_key(key)?;
        self.writes.insert(key.to_string(), None);
        Ok(())
    }

    fn range_scan(&mut self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let mut merged: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        for (key, version, value) in self.ledger.scan(start, end) {
            self.record_read(&key, version);
            merged.insert(key, value);
        }
        for (key, value) in &self.writes {
            if key.as_str() < start || key.as_str() >= end {
                continue;
            }
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}
