//! # Ledger Records
//!
//! Key layout and typed JSON access.
//!
//! | Key | Record |
//! |-----|--------|
//! | `license:<id>` | license |
//! | `agency:<name>` | agency |
//! | `swid:<primary tag>` | software identification tag |
//! | `ngac:graph` | the policy graph document |

use blossom_core::BlossomError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::KvStore;

/// Prefix of license record keys.
pub const LICENSE_PREFIX: &str = "license:";
/// Prefix of agency record keys.
pub const AGENCY_PREFIX: &str = "agency:";
/// Prefix of SwID record keys.
pub const SWID_PREFIX: &str = "swid:";
/// Key of the persisted policy graph.
pub const GRAPH_KEY: &str = "ngac:graph";

/// Ledger key of license `id`.
pub fn license_key(id: &str) -> String {
    format!("{LICENSE_PREFIX}{id}")
}

/// Ledger key of agency `name`.
pub fn agency_key(name: &str) -> String {
    format!("{AGENCY_PREFIX}{name}")
}

/// Ledger key of the SwID with `primary_tag`.
pub fn swid_key(primary_tag: &str) -> String {
    format!("{SWID_PREFIX}{primary_tag}")
}

/// Read and decode the record at `key`.
pub fn get_record<T, S>(store: &mut S, key: &str) -> Result<Option<T>, BlossomError>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Encode and write `record` at `key`.
pub fn put_record<T, S>(store: &mut S, key: &str, record: &T) -> Result<(), BlossomError>
where
    T: Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    let bytes = serde_json::to_vec(record)?;
    store.put(key, bytes)?;
    Ok(())
}

/// Remove the record at `key`.
pub fn delete_record<S>(store: &mut S, key: &str) -> Result<(), BlossomError>
where
    S: KvStore + ?Sized,
{
    store.delete(key)?;
    Ok(())
}

/// Decode every record whose key starts with `prefix`, in key order.
pub fn scan_records<T, S>(store: &mut S, prefix: &str) -> Result<Vec<T>, BlossomError>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    let end = prefix_end(prefix);
    store
        .range_scan(prefix, &end)?
        .into_iter()
        .map(|(_, bytes)| serde_json::from_slice(&bytes).map_err(BlossomError::from))
        .collect()
}

/// The smallest string greater than every string starting with `prefix`.
fn prefix_end(prefix: &str) -> String {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = char::from_u32(last as u32 + 1) {
            chars.push(next);
            return chars.into_iter().collect();
        }
    }
    // Only reachable for an all-`char::MAX` prefix.
    char::MAX.to_string().repeat(prefix.chars().count() + 1)
}
