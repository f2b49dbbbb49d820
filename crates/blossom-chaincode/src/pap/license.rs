//! # License Graph Layout
//!
//! ```text
//!   OA license:<id> ◀── licenses
//!   ├── O license:<id>:key:<k1>
//!   └── O license:<id>:key:<k2>   ──▶ <agency>_oa   while checked out
//! ```
//!
//! A checked-out key object is also contained in the holding agency's
//! object attribute, so the agency's grants reach it.

use blossom_core::BlossomError;
use blossom_ngac::{execute, Graph, GraphCommand, NodeType};

use super::agency::oa_name;
use super::bootstrap::LICENSES_OA;
use super::create;

/// The license's object attribute.
pub fn license_oa(id: &str) -> String {
    format!("license:{id}")
}

/// The object representing one key of a license.
pub fn key_object(id: &str, key: &str) -> String {
    format!("license:{id}:key:{key}")
}

/// Write the layout of a newly onboarded license.
pub fn onboard(graph: &mut Graph, id: &str, keys: &[String]) -> Result<(), BlossomError> {
    let oa = license_oa(id);
    let mut commands = vec![create(&oa, NodeType::ObjectAttribute, &[LICENSES_OA])];
    commands.extend(
        keys.iter()
            .map(|k| create(key_object(id, k), NodeType::Object, &[&oa])),
    );
    execute(graph, &commands)
}

/// Contain each checked-out key object in the agency's object attribute.
pub fn checkout<'k>(
    graph: &mut Graph,
    id: &str,
    agency: &str,
    keys: impl IntoIterator<Item = &'k String>,
) -> Result<(), BlossomError> {
    let parent = oa_name(agency);
    let commands: Vec<_> = keys
        .into_iter()
        .map(|k| GraphCommand::Assign {
            child: key_object(id, k),
            parent: parent.clone(),
        })
        .collect();
    execute(graph, &commands)
}

/// Release each returned key object from the agency's object attribute.
pub fn checkin(graph: &mut Graph, id: &str, agency: &str, keys: &[String]) -> Result<(), BlossomError> {
    let parent = oa_name(agency);
    let commands: Vec<_> = keys
        .iter()
        .map(|k| GraphCommand::Deassign {
            child: key_object(id, k),
            parent: parent.clone(),
        })
        .collect();
    execute(graph, &commands)
}
