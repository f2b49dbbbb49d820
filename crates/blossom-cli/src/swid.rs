//! # SwID Subcommand
//!
//! - `blossom swid report <tag> --agency <a> --license <id> --key <k> --xml <file>`
//! - `blossom swid show <tag>`
//! - `blossom swid list --license <id>`

use std::path::PathBuf;

use anyhow::{Context, Result};
use blossom_state::SwId;
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::session::Session;

/// Arguments for `blossom swid`.
#[derive(Args, Debug)]
pub struct SwIdArgs {
    #[command(subcommand)]
    pub command: SwIdCommand,
}

/// SwID subcommands.
#[derive(Subcommand, Debug)]
pub enum SwIdCommand {
    /// Report the software tag of an installation.
    Report {
        /// Primary tag.
        tag: String,
        /// Reporting agency.
        #[arg(long)]
        agency: String,
        /// License the installation runs under.
        #[arg(long)]
        license: String,
        /// The checked-out key the installation uses.
        #[arg(long)]
        key: String,
        /// File holding the tag XML.
        #[arg(long)]
        xml: PathBuf,
    },
    /// Show one tag.
    Show {
        /// Primary tag.
        tag: String,
    },
    /// List the tags reported against a license.
    List {
        /// License id.
        #[arg(long)]
        license: String,
    },
}

/// Execute the swid subcommand.
pub fn run_swid(args: SwIdArgs, session: &Session) -> Result<Value> {
    match args.command {
        SwIdCommand::Report {
            tag,
            agency,
            license,
            key,
            xml,
        } => {
            let xml = std::fs::read_to_string(&xml)
                .with_context(|| format!("reading swid xml {}", xml.display()))?;
            let swid = SwId::new(tag, xml, license, key, agency.clone());
            session.invoke("report_swid", |c, ctx| c.report_swid(ctx, swid, &agency))?;
            Ok(Value::Null)
        }
        SwIdCommand::Show { tag } => {
            let swid = session.invoke("swid", |c, ctx| c.swid(ctx, &tag))?;
            Ok(serde_json::to_value(swid)?)
        }
        SwIdCommand::List { license } => {
            let swids = session.invoke("swids_for_license", |c, ctx| c.swids_for_license(ctx, &license))?;
            Ok(serde_json::to_value(swids)?)
        }
    }
}
