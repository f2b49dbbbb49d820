//! # Content Digest
//!
//! SHA-256 fingerprints of canonical JSON documents. The policy graph is
//! fingerprinted before and after every `UpdateGraph` so that operators can
//! correlate ledger state with the graph documents they submitted.
//!
//! Canonical here means the `serde_json` encoding of a value whose maps are
//! all `BTreeMap`s/`BTreeSet`s: keys are emitted in sorted order, so equal
//! documents hash equally.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::BlossomError;

/// A SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 digest of the JSON encoding of `value`.
pub fn sha256_digest(value: &impl Serialize) -> Result<ContentDigest, BlossomError> {
    let bytes = serde_json::to_vec(value)?;
    let hash = Sha256::digest(&bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    Ok(ContentDigest(out))
}
