//! # blossom-ledger — Key-Value Ledger
//!
//! The storage side of a Blossom transaction.
//!
//! - **Store** (`store.rs`): the [`KvStore`] trait every contract operation
//!   reads and writes through, and [`MemoryLedger`], a versioned in-memory
//!   store that can snapshot itself to a JSON file.
//! - **Transaction** (`transaction.rs`): optimistic MVCC. Reads record the
//!   version they saw, writes are buffered, and `commit` applies everything
//!   or nothing.
//! - **Records** (`records.rs`): key prefixes and typed JSON helpers.
//! - **Identity** (`identity.rs`): the verified caller behind a request.

pub mod identity;
pub mod records;
pub mod store;
pub mod transaction;

pub use identity::{ClientIdentity, IdentitySource, StaticIdentity};
pub use records::{
    agency_key, delete_record, get_record, license_key, put_record, scan_records, swid_key,
    AGENCY_PREFIX, GRAPH_KEY, LICENSE_PREFIX, SWID_PREFIX,
};
pub use store::{KvStore, MemoryLedger};
pub use transaction::Transaction;
