//! # Graph Subcommand
//!
//! - `blossom graph init`: write the base policy graph (administrator only).
//! - `blossom graph show`: print the policy graph document.
//! - `blossom graph update <file>`: converge the policy graph to a document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::session::Session;

/// Arguments for `blossom graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(subcommand)]
    pub command: GraphCommand,
}

/// Graph subcommands.
#[derive(Subcommand, Debug)]
pub enum GraphCommand {
    /// Write the base policy graph.
    Init,
    /// Print the policy graph.
    Show,
    /// Replace the policy graph with the document in `file`.
    Update {
        /// JSON graph document.
        file: PathBuf,
    },
}

/// Execute the graph subcommand.
pub fn run_graph(args: GraphArgs, session: &Session) -> Result<Value> {
    match args.command {
        GraphCommand::Init => {
            session.invoke("init_ngac", |c, ctx| c.init_ngac(ctx))?;
            Ok(Value::Null)
        }
        GraphCommand::Show => {
            let doc = session.invoke("graph", |c, ctx| c.graph(ctx))?;
            Ok(serde_json::to_value(doc)?)
        }
        GraphCommand::Update { file } => {
            let desired = std::fs::read_to_string(&file)
                .with_context(|| format!("reading graph document {}", file.display()))?;
            let update = session.invoke("update_graph", |c, ctx| c.update_graph(ctx, &desired))?;
            Ok(json!({
                "commands_applied": update.commands,
                "digest_before": update.before.to_string(),
                "digest_after": update.after.to_string(),
            }))
        }
    }
}
