//! Policy graph operations.

use blossom_core::{BlossomError, ContentDigest, GraphError, Operation};
use blossom_ngac::{check_commands, diff, execute, Graph, GraphDocument};

use super::Blossom;
use crate::context::TxContext;
use crate::pap::bootstrap::{base_graph, BLOSSOM_TARGET};
use crate::pdp;

impl Blossom {
    /// Write the base policy graph. Only the configured administrator may
    /// call this, and only once.
    pub fn init_ngac(&self, ctx: &mut TxContext<'_>) -> Result<(), BlossomError> {
        let user = ctx.user();
        let admin = self.config.admin.subject();
        if user != admin {
            return Err(BlossomError::access_denied(
                user,
                Operation::CreatePolicyClass.as_str(),
                BLOSSOM_TARGET,
            ));
        }
        if ctx.has_graph()? {
            return Err(BlossomError::AlreadyExists("policy graph".into()));
        }
        let graph = base_graph(&admin)?;
        ctx.save_graph(&graph)
    }

    /// Replace the policy graph with `desired` (a JSON graph document).
    ///
    /// The difference is computed as a command batch, the whole batch is
    /// authorized for the caller, and then applied. The graph is
    /// fingerprinted before and after.
    pub fn update_graph(&self, ctx: &mut TxContext<'_>, desired: &str) -> Result<GraphUpdate, BlossomError> {
        let desired = Graph::from_json(desired)?;
        let mut current = ctx.load_graph()?;
        let before = current.digest()?;
        let commands = diff(&current, &desired);
        tracing::debug!(commands = commands.len(), "graph diff computed");

        check_commands(&current, &ctx.user(), &commands)?;
        execute(&mut current, &commands)?;
        let after = current.digest()?;
        ctx.save_graph(&current)?;
        tracing::info!(
            commands = commands.len(),
            before = %before,
            after = %after,
            "policy graph updated"
        );
        Ok(GraphUpdate {
            commands: commands.len(),
            before,
            after,
        })
    }

    /// The current policy graph. Requires `view_graph`.
    pub fn graph(&self, ctx: &mut TxContext<'_>) -> Result<GraphDocument, BlossomError> {
        let graph = ctx.load_graph()?;
        pdp::authorize_view_graph(&graph, &ctx.user())?;
        Ok(graph.to_document())
    }
}

/// Outcome of [`Blossom::update_graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphUpdate {
    /// Number of commands applied.
    pub commands: usize,
    /// Fingerprint of the graph before the update.
    pub before: ContentDigest,
    /// Fingerprint of the graph after the update.
    pub after: ContentDigest,
}

/// Map a node-name clash from a layout write to a duplicate-record error.
pub(super) fn node_clash_as_exists(err: BlossomError, what: String) -> BlossomError {
    match err {
        BlossomError::Graph(GraphError::NodeExists(_)) => BlossomError::AlreadyExists(what),
        other => other,
    }
}
