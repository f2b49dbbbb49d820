//! # Policy Decisions
//!
//! Which right is checked on which node for each operation, and how records
//! are filtered to what the caller may see.
//!
//! | Operation | Checked on | Rights |
//! |-----------|------------|--------|
//! | `onboard_license` | `licenses` | `onboard_license` |
//! | `offboard_license` | `license:<id>` | `offboard_license` |
//! | `checkout_license` | `<agency>_info`, `license:<id>` | `checkout_license`, `view_license` |
//! | `checkin_license` | `<agency>_info` | `checkin_license` |
//! | `upload_ato` | `<agency>_info` | `upload_ato` |
//! | `update_agency_status` | `<agency>_info` | `update_agency_status` |
//! | `report_swid` | `<agency>_info` | `report_swid` |
//! | `graph` | `blossom_target` | `view_graph` |
//! | `update_graph` | per command | see `blossom_ngac::command` |
//!
//! ## Filtering
//!
//! Each record kind has a base view right. A caller without it gets an empty
//! shell whose key field is cleared, and list operations drop shells. With
//! the base right, each further field is kept only if its own right is held.
//! Unknown callers and missing nodes hold no rights.

pub mod agency;
pub mod license;
pub mod swid;

use blossom_core::{BlossomError, Operation};
use blossom_ngac::{Decider, Graph, Permissions};

use crate::pap::bootstrap::BLOSSOM_TARGET;

/// Require `view_graph` on the Blossom target object.
pub fn authorize_view_graph(graph: &Graph, user: &str) -> Result<(), BlossomError> {
    Decider::new(graph).authorize(user, BLOSSOM_TARGET, &[Operation::ViewGraph])
}

/// The caller's rights on `target`, empty when either node is unknown.
pub(crate) fn permissions_on(graph: &Graph, user: &str, target: &str) -> Permissions {
    Decider::new(graph)
        .list_permissions(user, target)
        .unwrap_or_default()
}
