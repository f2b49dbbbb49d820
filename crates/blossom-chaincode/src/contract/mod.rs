//! # The Blossom Contract
//!
//! [`Blossom`] exposes every operation as a method taking a [`TxContext`].
//! [`Blossom::invoke`] runs one method inside one ledger transaction:
//! the transaction commits only if the method returns `Ok`, and any error
//! (including a commit-time MVCC conflict) leaves the ledger untouched.
//!
//! | Group | Operations |
//! |-------|------------|
//! | Graph | `init_ngac`, `update_graph`, `graph` |
//! | License | `onboard_license`, `offboard_license`, `licenses`, `license_info`, `checkout_license`, `checkin_license` |
//! | Agency | `request_account`, `update_agency_status`, `upload_ato`, `agencies`, `agency` |
//! | SwID | `report_swid`, `swid`, `swids_for_license` |

mod agency;
mod graph;
mod license;
mod swid;

use blossom_core::{BlossomError, Timestamp};
use blossom_ledger::{agency_key, get_record, license_key, ClientIdentity, IdentitySource, MemoryLedger};
use blossom_state::{Agency, License};
use serde::{Deserialize, Serialize};

use crate::context::TxContext;

pub use graph::GraphUpdate;

/// Deployment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// The only identity allowed to run `init_ngac`; becomes the first
    /// member of `super_ua`.
    pub admin: ClientIdentity,
}

/// The contract.
#[derive(Debug, Clone)]
pub struct Blossom {
    config: ContractConfig,
}

impl Blossom {
    /// A contract with the given settings.
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    /// Deployment settings.
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Run `op` as the caller named by `identity`, in a fresh transaction
    /// on `ledger`, committing on success.
    pub fn invoke<R, F>(
        &self,
        ledger: &MemoryLedger,
        identity: &dyn IdentitySource,
        operation: &'static str,
        op: F,
    ) -> Result<R, BlossomError>
    where
        F: FnOnce(&Self, &mut TxContext<'_>) -> Result<R, BlossomError>,
    {
        let client = identity.client_identity()?;
        let user = client.subject();
        let mut tx = ledger.begin();

        let result = {
            let mut ctx = TxContext::new(&mut tx, client, Timestamp::now());
            op(self, &mut ctx)
        };

        match result {
            Ok(value) => {
                let writes = tx.is_dirty();
                let version = tx.commit().map_err(|e| {
                    tracing::warn!(operation, user = %user, error = %e, "commit rejected");
                    BlossomError::from(e)
                })?;
                if writes {
                    tracing::info!(operation, user = %user, version, "transaction committed");
                } else {
                    tracing::debug!(operation, user = %user, version, "read-only transaction");
                }
                Ok(value)
            }
            Err(err) if err.is_access_denied() => {
                tracing::warn!(operation, user = %user, error = %err, "access denied");
                Err(err)
            }
            Err(err) => {
                tracing::debug!(operation, user = %user, error = %err, "operation failed");
                Err(err)
            }
        }
    }
}

// ── Record lookups ──────────────────────────────────────────────────

fn load_agency(ctx: &mut TxContext<'_>, name: &str) -> Result<Agency, BlossomError> {
    get_record(ctx.store(), &agency_key(name))?
        .ok_or_else(|| BlossomError::NotFound(format!("agency {name}")))
}

fn load_license(ctx: &mut TxContext<'_>, id: &str) -> Result<License, BlossomError> {
    get_record(ctx.store(), &license_key(id))?
        .ok_or_else(|| BlossomError::NotFound(format!("license {id}")))
}

fn require_non_empty(field: &str, value: &str) -> Result<(), BlossomError> {
    if value.is_empty() {
        Err(BlossomError::Validation(format!("{field} must be non-empty")))
    } else {
        Ok(())
    }
}
