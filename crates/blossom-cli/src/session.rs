//! # Session
//!
//! One CLI invocation: the contract, the ledger loaded from its snapshot
//! file, and the identity the operation runs as. A successful operation
//! that wrote anything is saved back to the file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use blossom_chaincode::{Blossom, ContractConfig, TxContext};
use blossom_core::BlossomError;
use blossom_ledger::{ClientIdentity, MemoryLedger, StaticIdentity};

use crate::config::CliConfig;

/// The contract, its ledger and the caller.
#[derive(Debug)]
pub struct Session {
    contract: Blossom,
    ledger: MemoryLedger,
    ledger_path: PathBuf,
    identity: StaticIdentity,
}

impl Session {
    /// Open the ledger named by `config`, acting as `identity` (the
    /// configured administrator when `None`).
    pub fn open(config: &CliConfig, identity: Option<ClientIdentity>) -> Result<Self> {
        let ledger = MemoryLedger::open(&config.ledger_path)
            .with_context(|| format!("opening ledger {}", config.ledger_path.display()))?;
        let identity = identity.unwrap_or_else(|| config.admin.clone());
        tracing::debug!(
            ledger = %config.ledger_path.display(),
            user = %identity,
            entries = ledger.len(),
            "session opened"
        );
        Ok(Self {
            contract: Blossom::new(ContractConfig {
                admin: config.admin.clone(),
            }),
            ledger,
            ledger_path: config.ledger_path.clone(),
            identity: StaticIdentity(identity),
        })
    }

    /// Run one contract operation and persist the ledger if it changed.
    ///
    /// Contract failures are returned as [`BlossomError`] inside the
    /// `anyhow::Error`, so callers can recover the error class.
    pub fn invoke<R, F>(&self, operation: &'static str, op: F) -> Result<R>
    where
        F: FnOnce(&Blossom, &mut TxContext<'_>) -> Result<R, BlossomError>,
    {
        let before = self.ledger.sequence();
        let value = self.contract.invoke(&self.ledger, &self.identity, operation, op)?;
        if self.ledger.sequence() != before {
            self.ledger
                .save(&self.ledger_path)
                .with_context(|| format!("saving ledger {}", self.ledger_path.display()))?;
        }
        Ok(value)
    }
}
