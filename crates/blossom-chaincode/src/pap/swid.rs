//! # SwID Graph Layout
//!
//! A reported tag becomes object `swid:<primary tag>` inside the reporting
//! agency's object attribute, so members of that agency (and
//! administrators) can view it.

use blossom_core::BlossomError;
use blossom_ngac::{execute, Graph, NodeType};

use super::agency::oa_name;
use super::create;

/// The object representing a reported tag.
pub fn swid_object(primary_tag: &str) -> String {
    format!("swid:{primary_tag}")
}

/// Write the object of a newly reported tag.
pub fn report(graph: &mut Graph, primary_tag: &str, agency: &str) -> Result<(), BlossomError> {
    let parent = oa_name(agency);
    execute(
        graph,
        &[create(swid_object(primary_tag), NodeType::Object, &[&parent])],
    )
}
