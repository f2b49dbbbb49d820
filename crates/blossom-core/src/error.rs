//! # Error Types — Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`.
//!
//! ## Design
//!
//! - Every variant carries the identifiers needed to diagnose the failure
//!   without a retry: entity id, key, requested amount, user and target.
//! - Any error returned from a contract operation aborts the enclosing
//!   ledger transaction. There are no partial writes to report.

use thiserror::Error;

/// Top-level error returned by every Blossom contract operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlossomError {
    /// A license, agency, SwID or key does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate onboarding, account request or SwID report.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The policy decision point denied the request.
    #[error("user {user} does not have permission {operation} on {target}")]
    AccessDenied {
        /// Subject name of the caller.
        user: String,
        /// The operation that was required.
        operation: String,
        /// The graph node the operation was checked against.
        target: String,
    },

    /// A checkout asked for more keys than the license has available.
    #[error("requested amount ({requested}) of license {license} is invalid, {available} available")]
    InvalidAmount {
        /// The license being checked out.
        license: String,
        /// Number of keys requested.
        requested: usize,
        /// Number of keys available at the time of the request.
        available: usize,
    },

    /// The two mirrored views of a checkout disagree, or a returned key
    /// was never checked out.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    /// A policy graph command targeted a malformed or missing node.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// The key-value ledger rejected a read or a commit.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A ledger record or graph document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Request input is malformed.
    #[error("validation error: {0}")]
    Validation(String),
}

impl BlossomError {
    /// Build an `AccessDenied` error.
    pub fn access_denied(
        user: impl Into<String>,
        operation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::AccessDenied {
            user: user.into(),
            operation: operation.into(),
            target: target.into(),
        }
    }

    /// Whether this error is a policy denial.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

impl From<serde_json::Error> for BlossomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors raised by the policy graph store. The store is a pure labeled
/// graph, so every variant names the offending node(s).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A referenced node does not exist.
    #[error("node {0} does not exist")]
    NodeNotFound(String),

    /// `create_node` with a name already in use.
    #[error("node {0} already exists")]
    NodeExists(String),

    /// Assigning `child` to `parent` would close a cycle.
    #[error("assigning {child} to {parent} would create a cycle")]
    CycleDetected {
        /// Child of the rejected assignment.
        child: String,
        /// Parent of the rejected assignment.
        parent: String,
    },

    /// Node types do not admit the assignment (e.g. a PC as child).
    #[error("cannot assign {child} ({child_type}) to {parent} ({parent_type})")]
    InvalidAssignment {
        /// Child node.
        child: String,
        /// Child node type.
        child_type: String,
        /// Parent node.
        parent: String,
        /// Parent node type.
        parent_type: String,
    },

    /// Deassigning an edge that is not present.
    #[error("{child} is not assigned to {parent}")]
    AssignmentNotFound {
        /// Child node.
        child: String,
        /// Parent node.
        parent: String,
    },

    /// Node types do not admit the association (subject must be a UA).
    #[error("cannot associate {subject} with {target}: {reason}")]
    InvalidAssociation {
        /// Subject node.
        subject: String,
        /// Target node.
        target: String,
        /// Why the association was rejected.
        reason: String,
    },

    /// Dissociating a pair that has no association.
    #[error("no association between {subject} and {target}")]
    AssociationNotFound {
        /// Subject node.
        subject: String,
        /// Target node.
        target: String,
    },

    /// Associations must grant at least one operation.
    #[error("association between {subject} and {target} has an empty operation set")]
    EmptyOperationSet {
        /// Subject node.
        subject: String,
        /// Target node.
        target: String,
    },

    /// A non-policy-class node does not reach any policy class.
    #[error("node {0} is not contained in any policy class")]
    Unanchored(String),

    /// A graph document could not be parsed.
    #[error("malformed graph document: {0}")]
    Malformed(String),
}

/// Errors raised by the key-value ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A key read by the transaction changed before commit.
    #[error("mvcc read conflict on key {key}: read version {read}, current version {current}")]
    MvccConflict {
        /// The conflicting key.
        key: String,
        /// Version observed by the transaction (0 = absent).
        read: u64,
        /// Version at commit time (0 = absent).
        current: u64,
    },

    /// Backing storage failure (file-backed ledgers).
    #[error("ledger storage error: {0}")]
    Storage(String),

    /// Keys must be non-empty.
    #[error("invalid ledger key {0:?}")]
    InvalidKey(String),
}
