//! # Policy Administration
//!
//! The graph layouts Blossom maintains. Each function builds a batch of
//! [`GraphCommand`]s and applies it with [`execute`], so a layout is written
//! completely or not at all and the result is always anchored.
//!
//! Callers authorize first (see `pdp`). Nothing here checks permissions.
//!
//! [`GraphCommand`]: blossom_ngac::GraphCommand
//! [`execute`]: blossom_ngac::execute

pub mod agency;
pub mod bootstrap;
pub mod license;
pub mod swid;

use blossom_ngac::{GraphCommand, NodeType};

pub(crate) fn create(name: impl Into<String>, node_type: NodeType, parents: &[&str]) -> GraphCommand {
    GraphCommand::CreateNode {
        name: name.into(),
        node_type,
        parents: parents.iter().map(|p| p.to_string()).collect(),
    }
}

pub(crate) fn associate(subject: impl Into<String>, target: impl Into<String>, ops: &[&str]) -> GraphCommand {
    GraphCommand::Associate {
        subject: subject.into(),
        target: target.into(),
        operations: ops.iter().map(|o| o.to_string()).collect(),
    }
}
