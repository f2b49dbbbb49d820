//! # blossom-state — Ledger Records and the License Inventory Engine
//!
//! The records Blossom keeps on the ledger, and the state machine that moves
//! license keys between a license's pool and the agencies holding them.
//!
//! ## Records
//!
//! - **Agency** (`agency.rs`): an organization that requests an account,
//!   moves through a lifecycle status, and holds checked-out keys.
//!
//! - **License** (`license.rs`): a pool of keys with a FIFO queue of
//!   available keys and a per-agency ledger of checked-out keys. The
//!   inventory operations (`onboard`, `checkout`, `checkin`) live here.
//!
//! - **SwID** (`swid.rs`): a software identification tag an agency reports
//!   for an installation that uses one of its checked-out keys.
//!
//! ## Mirrored views
//!
//! A checkout is recorded twice, once on each side:
//!
//! ```text
//!   license.checked_out[agency] == agency.assets[license.id]
//! ```
//!
//! Every inventory operation takes both records mutably and updates both or
//! neither.

pub mod agency;
pub mod license;
pub mod swid;

pub use agency::{Agency, AgencyStatus, Users};
pub use license::{checkin, checkout, CheckedOutKeys, InventoryError, License};
pub use swid::SwId;
