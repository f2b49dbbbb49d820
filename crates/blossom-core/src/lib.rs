//! # blossom-core — Foundational Types for Blossom
//!
//! The leaf of the workspace dependency DAG. Every other `blossom-*` crate
//! depends on it; it depends on nothing internal.
//!
//! ## Contents
//!
//! 1. **Error taxonomy.** `BlossomError` is the single error surfaced by
//!    contract operations. `GraphError` and `LedgerError` are the narrower
//!    errors of the policy graph store and the ledger, and convert into it.
//!
//! 2. **UTC-only timestamps.** `Timestamp` truncates to seconds and is the
//!    only time type stored on the ledger (onboarding dates, key expirations).
//!
//! 3. **Operation vocabulary.** `Operation` is the one definition of every
//!    access right the policy graph can grant. Associations store operations
//!    as strings so that imported graphs may carry custom rights, but every
//!    decision the contract makes goes through this enum.
//!
//! 4. **Digests.** `sha256_digest()` fingerprints canonical JSON documents
//!    (the persisted policy graph).
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod operation;
pub mod temporal;

pub use digest::{sha256_digest, ContentDigest};
pub use error::{BlossomError, GraphError, LedgerError};
pub use operation::{Operation, ALL_OPERATIONS, WILDCARD};
pub use temporal::Timestamp;
