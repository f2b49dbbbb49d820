//! # Operation Vocabulary — Single Source of Truth
//!
//! Defines the `Operation` enum: every access right an association in the
//! policy graph can grant and every right the contract checks. Each `match`
//! on `Operation` is exhaustive, so adding a right forces every consumer to
//! handle it.
//!
//! Graph documents store operations as strings. [`WILDCARD`] (`*`) in an
//! association's operation set grants every operation, including custom
//! strings this enum does not know.
//!
//! | Group | Operations |
//! |-------|------------|
//! | Agency visibility | `view_agency`, `view_ato`, `view_mspid`, `view_users`, `view_status`, `view_agency_licenses` |
//! | Agency lifecycle | `upload_ato`, `update_agency_status` |
//! | License | `onboard_license`, `offboard_license`, `view_license`, `view_license_keys`, `view_checked_out`, `checkout_license`, `checkin_license` |
//! | SwID | `report_swid`, `view_swid` |
//! | Graph administration | `create_policy_class`, `create_node`, `delete_node`, `assign`, `assign_to`, `deassign`, `deassign_from`, `associate`, `dissociate`, `view_graph` |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BlossomError;

/// Operation string that grants every operation.
pub const WILDCARD: &str = "*";

/// Every access right known to Blossom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// See that an agency exists (base agency visibility).
    ViewAgency,
    /// See an agency's ATO document.
    ViewAto,
    /// See an agency's MSP identifier.
    ViewMspid,
    /// See an agency's named users.
    ViewUsers,
    /// See an agency's lifecycle status.
    ViewStatus,
    /// See the license keys an agency holds.
    ViewAgencyLicenses,
    /// Upload an agency's ATO.
    UploadAto,
    /// Change an agency's lifecycle status.
    UpdateAgencyStatus,
    /// Onboard a new license.
    OnboardLicense,
    /// Offboard a license.
    OffboardLicense,
    /// See that a license exists (base license visibility).
    ViewLicense,
    /// See a license's full and available key pools.
    ViewLicenseKeys,
    /// See which agencies hold which keys of a license.
    ViewCheckedOut,
    /// Check out keys on behalf of an agency.
    CheckoutLicense,
    /// Return keys on behalf of an agency.
    CheckinLicense,
    /// Report a software identification tag.
    ReportSwid,
    /// See a software identification tag.
    ViewSwid,
    /// Create a new policy class.
    CreatePolicyClass,
    /// Create a node inside a container.
    CreateNode,
    /// Delete a node.
    DeleteNode,
    /// Assign a node (checked on the child).
    Assign,
    /// Receive an assignment (checked on the parent).
    AssignTo,
    /// Deassign a node (checked on the child).
    Deassign,
    /// Lose an assignment (checked on the parent).
    DeassignFrom,
    /// Create an association (checked on subject and target).
    Associate,
    /// Remove an association (checked on subject and target).
    Dissociate,
    /// Export the policy graph.
    ViewGraph,
}

/// All operations, in declaration order.
pub const ALL_OPERATIONS: [Operation; 27] = [
    Operation::ViewAgency,
    Operation::ViewAto,
    Operation::ViewMspid,
    Operation::ViewUsers,
    Operation::ViewStatus,
    Operation::ViewAgencyLicenses,
    Operation::UploadAto,
    Operation::UpdateAgencyStatus,
    Operation::OnboardLicense,
    Operation::OffboardLicense,
    Operation::ViewLicense,
    Operation::ViewLicenseKeys,
    Operation::ViewCheckedOut,
    Operation::CheckoutLicense,
    Operation::CheckinLicense,
    Operation::ReportSwid,
    Operation::ViewSwid,
    Operation::CreatePolicyClass,
    Operation::CreateNode,
    Operation::DeleteNode,
    Operation::Assign,
    Operation::AssignTo,
    Operation::Deassign,
    Operation::DeassignFrom,
    Operation::Associate,
    Operation::Dissociate,
    Operation::ViewGraph,
];

impl Operation {
    /// The string stored in association operation sets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewAgency => "view_agency",
            Self::ViewAto => "view_ato",
            Self::ViewMspid => "view_mspid",
            Self::ViewUsers => "view_users",
            Self::ViewStatus => "view_status",
            Self::ViewAgencyLicenses => "view_agency_licenses",
            Self::UploadAto => "upload_ato",
            Self::UpdateAgencyStatus => "update_agency_status",
            Self::OnboardLicense => "onboard_license",
            Self::OffboardLicense => "offboard_license",
            Self::ViewLicense => "view_license",
            Self::ViewLicenseKeys => "view_license_keys",
            Self::ViewCheckedOut => "view_checked_out",
            Self::CheckoutLicense => "checkout_license",
            Self::CheckinLicense => "checkin_license",
            Self::ReportSwid => "report_swid",
            Self::ViewSwid => "view_swid",
            Self::CreatePolicyClass => "create_policy_class",
            Self::CreateNode => "create_node",
            Self::DeleteNode => "delete_node",
            Self::Assign => "assign",
            Self::AssignTo => "assign_to",
            Self::Deassign => "deassign",
            Self::DeassignFrom => "deassign_from",
            Self::Associate => "associate",
            Self::Dissociate => "dissociate",
            Self::ViewGraph => "view_graph",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = BlossomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPERATIONS
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| BlossomError::Validation(format!("unknown operation: {s:?}")))
    }
}
