//! # blossom-cli — Operator Command-Line Interface
//!
//! Runs contract operations against a ledger snapshot on disk, acting as
//! any identity the operator names. Every operation is one transaction:
//! the snapshot is rewritten only when the operation succeeded and wrote
//! something.
//!
//! ```bash
//! blossom graph init
//! blossom --user a1_so --msp A1MSP agency request a1 --mspid A1MSP \
//!     --system-owner a1_so --acquisition-specialist a1_acq --system-administrator a1_sa
//! blossom agency status a1 approved
//! blossom license onboard l1 --name "CAD Suite" --keys k1,k2,k3
//! blossom --user a1_sa --msp A1MSP license checkout l1 --agency a1 --amount 2
//! ```
//!
//! Results are printed to stdout as JSON. Failures are printed to stderr
//! as `{"error": {"code": ..., "message": ...}}` and the exit status
//! reflects the error class.

pub mod agency;
pub mod config;
pub mod graph;
pub mod license;
pub mod session;
pub mod swid;

use std::path::PathBuf;

use anyhow::Result;
use blossom_chaincode::{ErrorBody, ErrorCode};
use blossom_core::BlossomError;
use blossom_ledger::ClientIdentity;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::config::CliConfig;
use crate::session::Session;

/// Blossom: software license management under an NGAC policy graph.
#[derive(Parser, Debug)]
#[command(name = "blossom", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger snapshot file. Overrides the config file and BLOSSOM_LEDGER.
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Common name of the caller. Defaults to the configured administrator.
    #[arg(long, global = true, requires = "msp")]
    pub user: Option<String>,

    /// MSP id of the caller.
    #[arg(long, global = true, requires = "user")]
    pub msp: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Policy graph bootstrap, export and bulk update.
    Graph(graph::GraphArgs),
    /// License onboarding and key checkout.
    License(license::LicenseArgs),
    /// Agency accounts.
    Agency(agency::AgencyArgs),
    /// Software identification tags.
    Swid(swid::SwIdArgs),
}

impl Cli {
    /// The caller named on the command line, if any.
    pub fn identity(&self) -> Option<ClientIdentity> {
        match (&self.user, &self.msp) {
            (Some(cn), Some(msp)) => Some(ClientIdentity::new(cn.clone(), msp.clone())),
            _ => None,
        }
    }

    /// Resolve settings: config file, then `BLOSSOM_LEDGER`, then `--ledger`.
    pub fn settings(&self) -> Result<CliConfig> {
        let mut config = CliConfig::load(self.config.as_deref())?;
        if let Some(ledger) = &self.ledger {
            config.ledger_path = ledger.clone();
        }
        Ok(config)
    }
}

/// Run the parsed command against the resolved settings.
pub fn run(cli: Cli, config: &CliConfig) -> Result<Value> {
    let session = Session::open(config, cli.identity())?;
    match cli.command {
        Commands::Graph(args) => graph::run_graph(args, &session),
        Commands::License(args) => license::run_license(args, &session),
        Commands::Agency(args) => agency::run_agency(args, &session),
        Commands::Swid(args) => swid::run_swid(args, &session),
    }
}

/// The JSON error body and exit status for a failed command.
pub fn render_error(err: &anyhow::Error) -> (ErrorBody, u8) {
    let contract_error = err.downcast_ref::<BlossomError>().cloned().unwrap_or_else(|| {
        BlossomError::Ledger(blossom_core::LedgerError::Storage(format!("{err:#}")))
    });
    let body = ErrorBody::from(&contract_error);
    let status = ErrorCode::of(&contract_error).exit_status();
    (body, status)
}
