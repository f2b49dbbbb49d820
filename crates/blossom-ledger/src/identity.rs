//! # Caller Identity
//!
//! Every request arrives with an already-verified client identity. Blossom
//! only consumes it: the policy graph names users by their subject string
//!
//! ```text
//!   {common_name}:{msp_id}      e.g.  a1_system_owner:A1MSP
//! ```

use std::str::FromStr;

use blossom_core::BlossomError;
use serde::{Deserialize, Serialize};

// ── ClientIdentity ──────────────────────────────────────────────────

/// The caller of a contract operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Certificate common name.
    pub common_name: String,
    /// Membership service provider of the caller's organization.
    pub msp_id: String,
}

impl ClientIdentity {
    /// Construct an identity.
    pub fn new(common_name: impl Into<String>, msp_id: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            msp_id: msp_id.into(),
        }
    }

    /// The user node name in the policy graph.
    pub fn subject(&self) -> String {
        format!("{}:{}", self.common_name, self.msp_id)
    }
}

impl std::fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.common_name, self.msp_id)
    }
}

impl FromStr for ClientIdentity {
    type Err = BlossomError;

    /// Parse `common_name:msp_id`. The MSP id is everything after the last
    /// colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((cn, msp)) if !cn.is_empty() && !msp.is_empty() => Ok(Self::new(cn, msp)),
            _ => Err(BlossomError::Validation(format!(
                "identity {s:?} is not of the form common_name:msp_id"
            ))),
        }
    }
}

// ── IdentitySource ──────────────────────────────────────────────────

/// Where the contract learns who is calling.
pub trait IdentitySource {
    /// The verified caller of the current request.
    fn client_identity(&self) -> Result<ClientIdentity, BlossomError>;
}

/// A fixed identity, for tests and the operator CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity(pub ClientIdentity);

impl StaticIdentity {
    /// Identity `common_name:msp_id`.
    pub fn new(common_name: impl Into<String>, msp_id: impl Into<String>) -> Self {
        Self(ClientIdentity::new(common_name, msp_id))
    }
}

impl IdentitySource for StaticIdentity {
    fn client_identity(&self) -> Result<ClientIdentity, BlossomError> {
        Ok(self.0.clone())
    }
}

impl<T: IdentitySource + ?Sized> IdentitySource for &T {
    fn client_identity(&self) -> Result<ClientIdentity, BlossomError> {
        (**self).client_identity()
    }
}
