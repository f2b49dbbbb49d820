//! # Agency Records
//!
//! An agency requests an account, is approved (or not) by the Blossom
//! administrators, and then checks license keys in and out through its
//! system administrator.
//!
//! ## Status
//!
//! ```text
//! PendingApproval ──▶ PendingATO ──▶ Approved ──▶ Inactive*
//!        │                              ▲            │
//!        └──▶ PendingDenied             └────────────┘
//! ```
//!
//! Status changes are administrative and are not restricted to the arrows
//! above; the arrows show the intended flow. Only `Approved` grants access
//! to licenses. Agencies are never deleted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::license::CheckedOutKeys;

// ─── Status ──────────────────────────────────────────────────────────

/// Lifecycle status of an agency. Serialized as human-readable strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgencyStatus {
    /// Account requested, awaiting approval.
    #[serde(rename = "Pending: waiting for approval")]
    PendingApproval,
    /// Approved pending an Authority To Operate.
    #[serde(rename = "Pending: waiting for ATO")]
    PendingAto,
    /// Account request denied.
    #[serde(rename = "Pending: request denied")]
    PendingDenied,
    /// Active member.
    #[serde(rename = "Approved")]
    Approved,
    /// The ATO lapsed.
    #[serde(rename = "Inactive: waiting for ATO renewal")]
    InactiveAto,
    /// The agency left.
    #[serde(rename = "Inactive: opted out")]
    InactiveOptOut,
    /// Suspended as a security risk.
    #[serde(rename = "Inactive: security risk")]
    InactiveSecurityRisk,
    /// Suspended for breaking the rules of engagement.
    #[serde(rename = "Inactive: breach in rules of engagement")]
    InactiveRulesOfEngagement,
}

impl AgencyStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [AgencyStatus; 8] = [
        Self::PendingApproval,
        Self::PendingAto,
        Self::PendingDenied,
        Self::Approved,
        Self::InactiveAto,
        Self::InactiveOptOut,
        Self::InactiveSecurityRisk,
        Self::InactiveRulesOfEngagement,
    ];

    /// The serialized string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "Pending: waiting for approval",
            Self::PendingAto => "Pending: waiting for ATO",
            Self::PendingDenied => "Pending: request denied",
            Self::Approved => "Approved",
            Self::InactiveAto => "Inactive: waiting for ATO renewal",
            Self::InactiveOptOut => "Inactive: opted out",
            Self::InactiveSecurityRisk => "Inactive: security risk",
            Self::InactiveRulesOfEngagement => "Inactive: breach in rules of engagement",
        }
    }

    /// Whether the agency may use licenses.
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl std::fmt::Display for AgencyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgencyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown agency status {s:?}"))
    }
}

// ─── Users ───────────────────────────────────────────────────────────

/// The three named users an agency acts through. Each value is the user's
/// common name; the graph user is `<common name>:<agency mspid>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Users {
    /// Responsible for the agency system; uploads the ATO.
    pub system_owner: String,
    /// Authorizes acquisitions.
    pub acquisition_specialist: String,
    /// Checks licenses in and out and reports SwIDs.
    pub system_administrator: String,
}

impl Users {
    /// Construct the user triple.
    pub fn new(
        system_owner: impl Into<String>,
        acquisition_specialist: impl Into<String>,
        system_administrator: impl Into<String>,
    ) -> Self {
        Self {
            system_owner: system_owner.into(),
            acquisition_specialist: acquisition_specialist.into(),
            system_administrator: system_administrator.into(),
        }
    }
}

// ─── Agency ──────────────────────────────────────────────────────────

/// An agency record, keyed on the ledger by `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    /// Unique agency name.
    pub name: String,
    /// Authority To Operate document.
    #[serde(default)]
    pub ato: String,
    /// Membership service provider id of the agency's organization.
    #[serde(default)]
    pub mspid: String,
    /// The agency's named users.
    #[serde(default)]
    pub users: Users,
    /// Lifecycle status. Absent only on filtered shells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AgencyStatus>,
    /// License id → checked-out key → expiration.
    #[serde(default)]
    pub assets: BTreeMap<String, CheckedOutKeys>,
}

impl Agency {
    /// A freshly requested account, pending approval with no ATO and no keys.
    pub fn request(name: impl Into<String>, mspid: impl Into<String>, users: Users) -> Self {
        Self {
            name: name.into(),
            ato: String::new(),
            mspid: mspid.into(),
            users,
            status: Some(AgencyStatus::PendingApproval),
            assets: BTreeMap::new(),
        }
    }

    /// Whether the agency is approved.
    pub fn is_approved(&self) -> bool {
        self.status.is_some_and(|s| s.is_approved())
    }

    /// Keys of `license_id` held by this agency.
    pub fn keys_for(&self, license_id: &str) -> Option<&CheckedOutKeys> {
        self.assets.get(license_id)
    }

    /// Whether the agency currently holds `key` of `license_id`.
    pub fn holds_key(&self, license_id: &str, key: &str) -> bool {
        self.keys_for(license_id)
            .is_some_and(|keys| keys.contains_key(key))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
