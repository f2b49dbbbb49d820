//! # Error Codes
//!
//! Maps [`BlossomError`] to a stable code and a structured body for callers
//! outside the process (the CLI prints it as JSON and derives its exit
//! status from it).

use blossom_core::BlossomError;
use serde::Serialize;

/// Stable, coarse error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing record or graph node.
    NotFound,
    /// Duplicate record or graph node.
    AlreadyExists,
    /// Policy denial.
    Forbidden,
    /// Bad request input, including invalid amounts.
    Invalid,
    /// Records disagree with each other.
    Conflict,
    /// Storage or serialization failure.
    Internal,
}

impl ErrorCode {
    /// Classify an error.
    pub fn of(err: &BlossomError) -> Self {
        use blossom_core::{GraphError, LedgerError};
        match err {
            BlossomError::NotFound(_) | BlossomError::Graph(GraphError::NodeNotFound(_)) => Self::NotFound,
            BlossomError::AlreadyExists(_) | BlossomError::Graph(GraphError::NodeExists(_)) => {
                Self::AlreadyExists
            }
            BlossomError::AccessDenied { .. } => Self::Forbidden,
            BlossomError::InvalidAmount { .. } | BlossomError::Validation(_) | BlossomError::Graph(_) => {
                Self::Invalid
            }
            BlossomError::InconsistentState(_) | BlossomError::Ledger(LedgerError::MvccConflict { .. }) => {
                Self::Conflict
            }
            BlossomError::Ledger(_) | BlossomError::Serialization(_) => Self::Internal,
        }
    }

    /// Process exit status for this class.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::NotFound => 3,
            Self::AlreadyExists => 4,
            Self::Forbidden => 5,
            Self::Invalid => 6,
            Self::Conflict => 7,
            Self::Internal => 1,
        }
    }
}

/// `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// The error.
    pub error: ErrorDetail,
}

/// Code and human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Error class.
    pub code: ErrorCode,
    /// Display form of the error.
    pub message: String,
}

impl From<&BlossomError> for ErrorBody {
    fn from(err: &BlossomError) -> Self {
        Self {
            error: ErrorDetail {
                code: ErrorCode::of(err),
                message: err.to_string(),
            },
        }
    }
}
