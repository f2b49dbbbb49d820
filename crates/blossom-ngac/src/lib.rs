//! # blossom-ngac — NGAC Policy Graph
//!
//! The policy machinery every Blossom operation is gated by.
//!
//! ## Components
//!
//! - **Graph store** (`graph.rs`): nodes, assignment edges (child → parent,
//!   a DAG) and association edges (UA → target, labeled with operations).
//!   A pure data structure: it enforces referential integrity, node-type
//!   rules and acyclicity, and nothing else.
//!
//! - **Differ** (`diff.rs`): the ordered command sequence that turns a
//!   current graph into a desired one.
//!
//! - **Commands** (`command.rs`): the six mutation variants, each able to
//!   apply itself and to declare the permissions it requires. The executor
//!   and the all-or-nothing batch checker live here.
//!
//! - **Decider** (`decider.rs`): resolves the operations a user holds on a
//!   target and fails closed.
//!
//! ## Determinism
//!
//! Every collection is a `BTreeMap`/`BTreeSet`. Diffing, serialization and
//! permission listing therefore produce identical output on every peer that
//! executes the same transaction.

pub mod command;
pub mod decider;
pub mod diff;
pub mod graph;

pub use command::{check_commands, execute, GraphCommand, RequiredPermission, POLICY_CLASS_TARGET};
pub use decider::{Decider, Permissions};
pub use diff::diff;
pub use graph::{Assignments, Associations, Graph, GraphDocument, Node, NodeType};
