//! # CLI Configuration
//!
//! Settings come from an optional YAML file, then the environment:
//!
//! ```yaml
//! ledger_path: ./blossom-ledger.json
//! admin:
//!   common_name: admin
//!   msp_id: Org1MSP
//! ```
//!
//! `BLOSSOM_LEDGER` overrides `ledger_path`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blossom_ledger::ClientIdentity;
use serde::Deserialize;

/// Environment variable overriding the ledger file.
pub const LEDGER_ENV: &str = "BLOSSOM_LEDGER";

/// Ledger file used when neither the config file nor the environment names one.
pub const DEFAULT_LEDGER_PATH: &str = "blossom-ledger.json";

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// JSON snapshot of the ledger.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    /// The contract administrator.
    #[serde(default = "default_admin")]
    pub admin: ClientIdentity,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from(DEFAULT_LEDGER_PATH)
}

fn default_admin() -> ClientIdentity {
    ClientIdentity::new("admin", "Org1MSP")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
            admin: default_admin(),
        }
    }
}

impl CliConfig {
    /// Read `path` (defaults when absent), then apply `ledger_override`.
    pub fn resolve(path: Option<&Path>, ledger_override: Option<PathBuf>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(ledger) = ledger_override {
            config.ledger_path = ledger;
        }
        Ok(config)
    }

    /// [`resolve`](Self::resolve) with the override taken from `BLOSSOM_LEDGER`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let ledger = std::env::var_os(LEDGER_ENV).map(PathBuf::from);
        Self::resolve(path, ledger)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
