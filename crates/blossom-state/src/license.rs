//! # License Inventory Engine
//!
//! A license is a fixed pool of keys. Keys move between the license's FIFO
//! queue of available keys and the agencies that check them out:
//!
//! ```text
//!            checkout (front, n keys, +1 year expiry)
//!   available_keys ─────────────────────────────────▶ checked_out[agency]
//!        ▲                                            == agency.assets[id]
//!        └──────────────────────────────────────────────────┘
//!            checkin (named keys, appended at the back)
//! ```
//!
//! ## Invariants
//!
//! - `available == len(available_keys)`
//! - `available + Σ len(checked_out[*]) == len(all_keys)`
//! - every key of `all_keys` is in exactly one place
//! - `checked_out[a] == a.assets[id]` for every agency `a`
//!
//! Every operation validates before it mutates, so an error leaves both
//! records exactly as they were.

use std::collections::{BTreeMap, BTreeSet};

use blossom_core::{BlossomError, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agency::Agency;

/// Checked-out key → expiration.
pub type CheckedOutKeys = BTreeMap<String, Timestamp>;

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by inventory operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Checkout of zero keys or of more keys than are available.
    #[error("requested amount ({requested}) of license {license} is invalid, {available} available")]
    InvalidAmount {
        /// License id.
        license: String,
        /// Keys requested.
        requested: usize,
        /// Keys available.
        available: usize,
    },

    /// A returned key is not recorded as checked out by the agency on one
    /// side or the other.
    #[error("key {key} of license {license} is not checked out by {agency}")]
    KeyNotCheckedOut {
        /// License id.
        license: String,
        /// Agency name.
        agency: String,
        /// The offending key.
        key: String,
    },

    /// The license and agency disagree about what the agency holds.
    #[error("license {license} and agency {agency} disagree on checked-out keys")]
    MirrorMismatch {
        /// License id.
        license: String,
        /// Agency name.
        agency: String,
    },

    /// The license's counts disagree with where its keys are.
    #[error("license {license} is inconsistent: {available} available, {queued} queued, {total} keys in total")]
    Inconsistent {
        /// License id.
        license: String,
        /// The stored available count.
        available: usize,
        /// Length of the available queue.
        queued: usize,
        /// Length of the key pool.
        total: usize,
    },

    /// A key was listed twice in one request or one pool.
    #[error("key {key} is listed more than once")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// License ids must be non-empty.
    #[error("license id must be non-empty")]
    EmptyId,

    /// The expiration instant is out of range.
    #[error("cannot compute key expiration: {0}")]
    Expiration(String),
}

impl From<InventoryError> for BlossomError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InvalidAmount {
                license,
                requested,
                available,
            } => BlossomError::InvalidAmount {
                license,
                requested,
                available,
            },
            e @ (InventoryError::KeyNotCheckedOut { .. }
            | InventoryError::MirrorMismatch { .. }
            | InventoryError::Inconsistent { .. }) => {
                BlossomError::InconsistentState(e.to_string())
            }
            e @ (InventoryError::DuplicateKey { .. }
            | InventoryError::EmptyId
            | InventoryError::Expiration(_)) => BlossomError::Validation(e.to_string()),
        }
    }
}

// ─── License ─────────────────────────────────────────────────────────

/// A license record, keyed on the ledger by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Unique license id.
    pub id: String,
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// When the license was onboarded. Absent only on filtered shells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_date: Option<Timestamp>,
    /// Every key, in onboarding order.
    #[serde(default)]
    pub all_keys: Vec<String>,
    /// Keys not checked out, in the order they will be handed out.
    #[serde(default)]
    pub available_keys: Vec<String>,
    /// `available_keys.len()`.
    #[serde(default)]
    pub available: usize,
    /// Agency → checked-out key → expiration.
    #[serde(default)]
    pub checked_out: BTreeMap<String, CheckedOutKeys>,
}

impl License {
    /// A newly onboarded license with every key available.
    pub fn onboard(
        id: impl Into<String>,
        name: impl Into<String>,
        keys: Vec<String>,
        now: Timestamp,
    ) -> Result<Self, InventoryError> {
        let id = id.into();
        if id.is_empty() {
            return Err(InventoryError::EmptyId);
        }
        check_unique(&keys)?;
        Ok(Self {
            id,
            name: name.into(),
            onboarding_date: Some(now),
            available: keys.len(),
            available_keys: keys.clone(),
            all_keys: keys,
            checked_out: BTreeMap::new(),
        })
    }

    /// Number of keys currently checked out across all agencies.
    pub fn checked_out_count(&self) -> usize {
        self.checked_out.values().map(BTreeMap::len).sum()
    }

    /// Whether `agency` holds `key`.
    pub fn is_checked_out_by(&self, agency: &str, key: &str) -> bool {
        self.checked_out
            .get(agency)
            .is_some_and(|keys| keys.contains_key(key))
    }

    /// Whether the counting and placement invariants hold.
    pub fn is_consistent(&self) -> bool {
        if self.available != self.available_keys.len()
            || self.available + self.checked_out_count() != self.all_keys.len()
        {
            return false;
        }
        let all: BTreeSet<&str> = self.all_keys.iter().map(String::as_str).collect();
        let mut placed = BTreeSet::new();
        let held = self.checked_out.values().flat_map(BTreeMap::keys);
        for key in self.available_keys.iter().chain(held) {
            if !all.contains(key.as_str()) || !placed.insert(key.as_str()) {
                return false;
            }
        }
        placed.len() == all.len()
    }

    fn check_consistent(&self) -> Result<(), InventoryError> {
        if self.is_consistent() {
            return Ok(());
        }
        Err(InventoryError::Inconsistent {
            license: self.id.clone(),
            available: self.available,
            queued: self.available_keys.len(),
            total: self.all_keys.len(),
        })
    }

    fn check_mirror(&self, agency: &Agency) -> Result<(), InventoryError> {
        let empty = CheckedOutKeys::new();
        let license_side = self.checked_out.get(&agency.name).unwrap_or(&empty);
        let agency_side = agency.assets.get(&self.id).unwrap_or(&empty);
        if license_side != agency_side {
            return Err(InventoryError::MirrorMismatch {
                license: self.id.clone(),
                agency: agency.name.clone(),
            });
        }
        Ok(())
    }
}

// ─── Inventory operations ────────────────────────────────────────────

/// Move `amount` keys from the front of the license's available queue to
/// `agency`, each expiring one year after `now`. Returns the keys taken.
pub fn checkout(
    license: &mut License,
    agency: &mut Agency,
    amount: usize,
    now: Timestamp,
) -> Result<CheckedOutKeys, InventoryError> {
    license.check_consistent()?;
    if amount == 0 || amount > license.available {
        return Err(InventoryError::InvalidAmount {
            license: license.id.clone(),
            requested: amount,
            available: license.available,
        });
    }
    license.check_mirror(agency)?;
    let expiration = now
        .plus_years(1)
        .map_err(|e| InventoryError::Expiration(e.to_string()))?;

    let taken: CheckedOutKeys = license
        .available_keys
        .drain(..amount)
        .map(|key| (key, expiration))
        .collect();
    license.available -= amount;

    license
        .checked_out
        .entry(agency.name.clone())
        .or_default()
        .extend(taken.clone());
    agency
        .assets
        .entry(license.id.clone())
        .or_default()
        .extend(taken.clone());

    Ok(taken)
}

/// Return `keys` from `agency` to the back of the license's available
/// queue, in the order given.
pub fn checkin(license: &mut License, agency: &mut Agency, keys: &[String]) -> Result<(), InventoryError> {
    license.check_consistent()?;
    check_unique(keys)?;
    for key in keys {
        if !license.is_checked_out_by(&agency.name, key) || !agency.holds_key(&license.id, key) {
            return Err(InventoryError::KeyNotCheckedOut {
                license: license.id.clone(),
                agency: agency.name.clone(),
                key: key.clone(),
            });
        }
    }

    if let Some(held) = license.checked_out.get_mut(&agency.name) {
        for key in keys {
            held.remove(key);
        }
        if held.is_empty() {
            license.checked_out.remove(&agency.name);
        }
    }
    if let Some(held) = agency.assets.get_mut(&license.id) {
        for key in keys {
            held.remove(key);
        }
        if held.is_empty() {
            agency.assets.remove(&license.id);
        }
    }
    license.available_keys.extend(keys.iter().cloned());
    license.available += keys.len();
    Ok(())
}

fn check_unique(keys: &[String]) -> Result<(), InventoryError> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(InventoryError::DuplicateKey { key: key.clone() });
        }
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────
