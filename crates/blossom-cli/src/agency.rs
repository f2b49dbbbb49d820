//! # Agency Subcommand
//!
//! - `blossom agency request <name> --mspid <msp> --system-owner <cn> --acquisition-specialist <cn> --system-administrator <cn>`
//! - `blossom agency status <name> <status>`
//! - `blossom agency upload-ato <name> --ato <text>`
//! - `blossom agency list`
//! - `blossom agency show <name>`

use anyhow::Result;
use blossom_state::{AgencyStatus, Users};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::Value;

use crate::session::Session;

/// Arguments for `blossom agency`.
#[derive(Args, Debug)]
pub struct AgencyArgs {
    #[command(subcommand)]
    pub command: AgencyCommand,
}

/// Agency subcommands.
#[derive(Subcommand, Debug)]
pub enum AgencyCommand {
    /// Request an account for a new agency.
    Request {
        /// Agency name.
        name: String,
        /// MSP id of the agency's organization.
        #[arg(long)]
        mspid: String,
        /// Common name of the system owner.
        #[arg(long)]
        system_owner: String,
        /// Common name of the acquisition specialist.
        #[arg(long)]
        acquisition_specialist: String,
        /// Common name of the system administrator.
        #[arg(long)]
        system_administrator: String,
    },
    /// Set an agency's status.
    Status {
        /// Agency name.
        name: String,
        /// New status.
        status: StatusArg,
    },
    /// Record an agency's authority to operate.
    UploadAto {
        /// Agency name.
        name: String,
        /// ATO document or reference.
        #[arg(long)]
        ato: String,
    },
    /// List every agency visible to the caller.
    List,
    /// Show one agency.
    Show {
        /// Agency name.
        name: String,
    },
}

/// Agency status as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    PendingApproval,
    PendingAto,
    PendingDenied,
    Approved,
    InactiveAto,
    InactiveOptOut,
    InactiveSecurityRisk,
    InactiveRulesOfEngagement,
}

impl From<StatusArg> for AgencyStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::PendingApproval => Self::PendingApproval,
            StatusArg::PendingAto => Self::PendingAto,
            StatusArg::PendingDenied => Self::PendingDenied,
            StatusArg::Approved => Self::Approved,
            StatusArg::InactiveAto => Self::InactiveAto,
            StatusArg::InactiveOptOut => Self::InactiveOptOut,
            StatusArg::InactiveSecurityRisk => Self::InactiveSecurityRisk,
            StatusArg::InactiveRulesOfEngagement => Self::InactiveRulesOfEngagement,
        }
    }
}

/// Execute the agency subcommand.
pub fn run_agency(args: AgencyArgs, session: &Session) -> Result<Value> {
    match args.command {
        AgencyCommand::Request {
            name,
            mspid,
            system_owner,
            acquisition_specialist,
            system_administrator,
        } => {
            let users = Users::new(system_owner, acquisition_specialist, system_administrator);
            session.invoke("request_account", |c, ctx| c.request_account(ctx, &name, &mspid, users))?;
            Ok(Value::Null)
        }
        AgencyCommand::Status { name, status } => {
            session.invoke("update_agency_status", |c, ctx| {
                c.update_agency_status(ctx, &name, status.into())
            })?;
            Ok(Value::Null)
        }
        AgencyCommand::UploadAto { name, ato } => {
            session.invoke("upload_ato", |c, ctx| c.upload_ato(ctx, &name, &ato))?;
            Ok(Value::Null)
        }
        AgencyCommand::List => {
            let agencies = session.invoke("agencies", |c, ctx| c.agencies(ctx))?;
            Ok(serde_json::to_value(agencies)?)
        }
        AgencyCommand::Show { name } => {
            let agency = session.invoke("agency", |c, ctx| c.agency(ctx, &name))?;
            Ok(serde_json::to_value(agency)?)
        }
    }
}
