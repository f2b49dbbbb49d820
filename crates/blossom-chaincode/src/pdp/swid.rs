//! SwID decisions and filtering.

use blossom_core::{BlossomError, Operation};
use blossom_ngac::{Decider, Graph};
use blossom_state::SwId;

use super::permissions_on;
use crate::pap::agency::info_object;
use crate::pap::swid::swid_object;

/// Require `report_swid` on the reporting agency.
pub fn authorize_report(graph: &Graph, user: &str, agency: &str) -> Result<(), BlossomError> {
    Decider::new(graph).authorize(user, &info_object(agency), &[Operation::ReportSwid])
}

/// Without `view_swid` on the tag, it becomes an empty shell.
pub fn filter_swid(graph: &Graph, user: &str, swid: &mut SwId) {
    if !permissions_on(graph, user, &swid_object(&swid.primary_tag)).allows(Operation::ViewSwid) {
        *swid = SwId::default();
    }
}

/// Drop every tag the caller cannot view.
pub fn filter_swids(graph: &Graph, user: &str, swids: Vec<SwId>) -> Vec<SwId> {
    swids
        .into_iter()
        .filter_map(|mut s| {
            filter_swid(graph, user, &mut s);
            (!s.primary_tag.is_empty()).then_some(s)
        })
        .collect()
}
