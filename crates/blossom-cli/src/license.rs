//! # License Subcommand
//!
//! - `blossom license onboard <id> --name <name> --keys k1,k2,...`
//! - `blossom license offboard <id>`
//! - `blossom license list`
//! - `blossom license show <id>`
//! - `blossom license checkout <id> --agency <agency> --amount <n>`
//! - `blossom license checkin <id> --agency <agency> --keys k1,...`

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::session::Session;

/// Arguments for `blossom license`.
#[derive(Args, Debug)]
pub struct LicenseArgs {
    #[command(subcommand)]
    pub command: LicenseCommand,
}

/// License subcommands.
#[derive(Subcommand, Debug)]
pub enum LicenseCommand {
    /// Add a license and its keys.
    Onboard {
        /// License id.
        id: String,
        /// Product name.
        #[arg(long)]
        name: String,
        /// License keys, in the order they are handed out.
        #[arg(long, value_delimiter = ',', required = true)]
        keys: Vec<String>,
    },
    /// Remove a license record.
    Offboard {
        /// License id.
        id: String,
    },
    /// List every license visible to the caller.
    List,
    /// Show one license.
    Show {
        /// License id.
        id: String,
    },
    /// Check keys out to an agency.
    Checkout {
        /// License id.
        id: String,
        /// Receiving agency.
        #[arg(long)]
        agency: String,
        /// Number of keys.
        #[arg(long)]
        amount: usize,
    },
    /// Return keys from an agency.
    Checkin {
        /// License id.
        id: String,
        /// Returning agency.
        #[arg(long)]
        agency: String,
        /// Keys to return.
        #[arg(long, value_delimiter = ',', required = true)]
        keys: Vec<String>,
    },
}

/// Execute the license subcommand.
pub fn run_license(args: LicenseArgs, session: &Session) -> Result<Value> {
    match args.command {
        LicenseCommand::Onboard { id, name, keys } => {
            session.invoke("onboard_license", |c, ctx| c.onboard_license(ctx, &id, &name, keys))?;
            Ok(Value::Null)
        }
        LicenseCommand::Offboard { id } => {
            session.invoke("offboard_license", |c, ctx| c.offboard_license(ctx, &id))?;
            Ok(Value::Null)
        }
        LicenseCommand::List => {
            let licenses = session.invoke("licenses", |c, ctx| c.licenses(ctx))?;
            Ok(serde_json::to_value(licenses)?)
        }
        LicenseCommand::Show { id } => {
            let license = session.invoke("license_info", |c, ctx| c.license_info(ctx, &id))?;
            Ok(serde_json::to_value(license)?)
        }
        LicenseCommand::Checkout { id, agency, amount } => {
            let keys = session.invoke("checkout_license", |c, ctx| {
                c.checkout_license(ctx, &id, &agency, amount)
            })?;
            Ok(serde_json::to_value(keys)?)
        }
        LicenseCommand::Checkin { id, agency, keys } => {
            session.invoke("checkin_license", |c, ctx| c.checkin_license(ctx, &id, &keys, &agency))?;
            Ok(Value::Null)
        }
    }
}
