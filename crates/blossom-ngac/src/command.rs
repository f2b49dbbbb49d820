//! # Graph Commands
//!
//! The six graph mutations as data. Each command can apply itself to a
//! [`Graph`] and declare the permissions a user needs to issue it.
//!
//! ## Required permissions
//!
//! | Command | Checks |
//! |---------|--------|
//! | `CreateNode` | `create_node` on every parent; a parentless PC needs `create_policy_class` on [`POLICY_CLASS_TARGET`]; a parentless non-PC needs nothing here |
//! | `DeleteNode` | `delete_node` on the node |
//! | `Assign` | `assign` on the child, `assign_to` on the parent |
//! | `Deassign` | `deassign` on the child, `deassign_from` on the parent |
//! | `Associate` | `associate` on subject and target |
//! | `Dissociate` | `dissociate` on subject and target |
//!
//! ## Batches
//!
//! [`check_commands`] authorizes a whole batch before anything is applied.
//! Each command is checked against the graph as it will look after the
//! commands before it, so a batch may create a container and then populate
//! it. One denial rejects the batch. [`execute`] applies a batch atomically:
//! the graph is only replaced when every command succeeded and the result
//! is anchored.
//!
//! Anchoring is not a permission: [`check_commands`] accepts a batch that
//! leaves a non-PC node without parents, and [`execute`] rejects it with
//! [`GraphError::Unanchored`].

use std::collections::BTreeSet;

use blossom_core::{BlossomError, GraphError, Operation};
use serde::{Deserialize, Serialize};

use crate::decider::Decider;
use crate::graph::{Graph, NodeType};

/// The object a user must hold `create_policy_class` on to create a
/// top-level policy class.
pub const POLICY_CLASS_TARGET: &str = "blossom_target";

/// A single graph mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum GraphCommand {
    /// Create a node, assigned to `parents`.
    CreateNode {
        /// New node name.
        name: String,
        /// New node type.
        node_type: NodeType,
        /// Initial parents, sorted.
        #[serde(default)]
        parents: Vec<String>,
    },
    /// Delete a node and its incident edges.
    DeleteNode {
        /// Node to delete.
        name: String,
    },
    /// Add an assignment edge.
    Assign {
        /// Child node.
        child: String,
        /// Parent node.
        parent: String,
    },
    /// Remove an assignment edge.
    Deassign {
        /// Child node.
        child: String,
        /// Parent node.
        parent: String,
    },
    /// Add (or extend) an association.
    Associate {
        /// Subject UA.
        subject: String,
        /// Target node.
        target: String,
        /// Granted operations.
        operations: BTreeSet<String>,
    },
    /// Remove an association.
    Dissociate {
        /// Subject UA.
        subject: String,
        /// Target node.
        target: String,
    },
}

/// An operation a user must hold on a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredPermission {
    /// The operation.
    pub operation: Operation,
    /// The node it is checked on.
    pub target: String,
}

impl RequiredPermission {
    fn new(operation: Operation, target: &str) -> Self {
        Self {
            operation,
            target: target.to_string(),
        }
    }
}

impl GraphCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateNode { .. } => "create_node",
            Self::DeleteNode { .. } => "delete_node",
            Self::Assign { .. } => "assign",
            Self::Deassign { .. } => "deassign",
            Self::Associate { .. } => "associate",
            Self::Dissociate { .. } => "dissociate",
        }
    }

    /// Apply this command to `graph`.
    pub fn apply(&self, graph: &mut Graph) -> Result<(), GraphError> {
        match self {
            Self::CreateNode {
                name,
                node_type,
                parents,
            } => {
                let parents: Vec<&str> = parents.iter().map(String::as_str).collect();
                graph.create_assigned(name, *node_type, &parents)
            }
            Self::DeleteNode { name } => graph.delete_node(name),
            Self::Assign { child, parent } => graph.assign(child, parent),
            Self::Deassign { child, parent } => graph.deassign(child, parent),
            Self::Associate {
                subject,
                target,
                operations,
            } => graph.associate(subject, target, operations.iter().cloned()),
            Self::Dissociate { subject, target } => graph.dissociate(subject, target),
        }
    }

    /// Permissions a user must hold to issue this command.
    pub fn required_permissions(&self) -> Vec<RequiredPermission> {
        match self {
            Self::CreateNode {
                node_type: NodeType::PolicyClass,
                parents,
                ..
            } if parents.is_empty() => vec![RequiredPermission::new(
                Operation::CreatePolicyClass,
                POLICY_CLASS_TARGET,
            )],
            Self::CreateNode { parents, .. } => parents
                .iter()
                .map(|p| RequiredPermission::new(Operation::CreateNode, p))
                .collect(),
            Self::DeleteNode { name } => vec![RequiredPermission::new(Operation::DeleteNode, name)],
            Self::Assign { child, parent } => vec![
                RequiredPermission::new(Operation::Assign, child),
                RequiredPermission::new(Operation::AssignTo, parent),
            ],
            Self::Deassign { child, parent } => vec![
                RequiredPermission::new(Operation::Deassign, child),
                RequiredPermission::new(Operation::DeassignFrom, parent),
            ],
            Self::Associate { subject, target, .. } => vec![
                RequiredPermission::new(Operation::Associate, subject),
                RequiredPermission::new(Operation::Associate, target),
            ],
            Self::Dissociate { subject, target } => vec![
                RequiredPermission::new(Operation::Dissociate, subject),
                RequiredPermission::new(Operation::Dissociate, target),
            ],
        }
    }
}

/// Authorize every command in `commands` for `user`, without touching
/// `graph`.
pub fn check_commands(graph: &Graph, user: &str, commands: &[GraphCommand]) -> Result<(), BlossomError> {
    let mut scratch = graph.clone();
    for command in commands {
        let decider = Decider::new(&scratch);
        for required in command.required_permissions() {
            decider.authorize(user, &required.target, &[required.operation])?;
        }
        command.apply(&mut scratch)?;
    }
    Ok(())
}

/// Apply `commands` to `graph` in order. On any failure, including an
/// unanchored result, `graph` is left unchanged.
pub fn execute(graph: &mut Graph, commands: &[GraphCommand]) -> Result<(), BlossomError> {
    let mut next = graph.clone();
    for command in commands {
        command.apply(&mut next).map_err(|e| {
            tracing::debug!(command = command.name(), error = %e, "graph command failed");
            e
        })?;
    }
    next.validate()?;
    *graph = next;
    Ok(())
}
