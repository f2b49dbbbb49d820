//! Agency decisions and filtering.

use blossom_core::{BlossomError, Operation};
use blossom_ngac::{Decider, Graph};
use blossom_state::{Agency, Users};

use super::permissions_on;
use crate::pap::agency::info_object;

/// Require `upload_ato` on the agency.
pub fn authorize_upload_ato(graph: &Graph, user: &str, agency: &str) -> Result<(), BlossomError> {
    Decider::new(graph).authorize(user, &info_object(agency), &[Operation::UploadAto])
}

/// Require `update_agency_status` on the agency.
pub fn authorize_update_status(graph: &Graph, user: &str, agency: &str) -> Result<(), BlossomError> {
    Decider::new(graph).authorize(user, &info_object(agency), &[Operation::UpdateAgencyStatus])
}

/// Clear every field of `agency` the caller may not view. Without
/// `view_agency` the record becomes an empty shell.
pub fn filter_agency(graph: &Graph, user: &str, agency: &mut Agency) {
    let perms = permissions_on(graph, user, &info_object(&agency.name));
    if !perms.allows(Operation::ViewAgency) {
        *agency = Agency::default();
        return;
    }
    if !perms.allows(Operation::ViewAto) {
        agency.ato.clear();
    }
    if !perms.allows(Operation::ViewMspid) {
        agency.mspid.clear();
    }
    if !perms.allows(Operation::ViewUsers) {
        agency.users = Users::default();
    }
    if !perms.allows(Operation::ViewStatus) {
        agency.status = None;
    }
    if !perms.allows(Operation::ViewAgencyLicenses) {
        agency.assets.clear();
    }
}

/// Filter each agency and drop the ones the caller cannot view.
pub fn filter_agencies(graph: &Graph, user: &str, agencies: Vec<Agency>) -> Vec<Agency> {
    agencies
        .into_iter()
        .filter_map(|mut a| {
            filter_agency(graph, user, &mut a);
            (!a.name.is_empty()).then_some(a)
        })
        .collect()
}
