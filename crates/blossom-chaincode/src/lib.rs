//! # blossom-chaincode — The Blossom Contract
//!
//! Every operation follows the same path:
//!
//! ```text
//!   identity ─▶ open transaction ─▶ load policy graph ─▶ PDP authorizes
//!            ─▶ PAP edits graph ─▶ inventory edits records ─▶ commit
//! ```
//!
//! ## Modules
//!
//! - **`context`**: [`TxContext`], the caller, the clock and the open
//!   transaction handed to each operation.
//! - **`pap`**: policy administration. The base graph written by
//!   `init_ngac` and the graph layouts of agencies, licenses and SwIDs.
//! - **`pdp`**: policy decisions. Which operation is checked on which node,
//!   and how records are filtered down to what the caller may see.
//! - **`contract`**: [`Blossom`], the exposed operations.
//! - **`error`**: stable error codes for callers outside the process.
//!
//! Nothing here holds state between transactions. The graph is read from
//! the ledger at the start of each operation and written back with the
//! records it changed.

pub mod context;
pub mod contract;
pub mod error;
pub mod pap;
pub mod pdp;

pub use context::TxContext;
pub use contract::{Blossom, ContractConfig, GraphUpdate};
pub use error::{ErrorBody, ErrorCode};
