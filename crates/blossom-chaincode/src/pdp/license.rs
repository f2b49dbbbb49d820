//! License decisions and filtering.

use blossom_core::{BlossomError, Operation};
use blossom_ngac::{Decider, Graph};
use blossom_state::License;

use super::permissions_on;
use crate::pap::agency::info_object;
use crate::pap::bootstrap::LICENSES_OA;
use crate::pap::license::license_oa;

/// Require `onboard_license` on the license container.
pub fn authorize_onboard(graph: &Graph, user: &str) -> Result<(), BlossomError> {
    Decider::new(graph).authorize(user, LICENSES_OA, &[Operation::OnboardLicense])
}

/// Require `offboard_license` on the license.
pub fn authorize_offboard(graph: &Graph, user: &str, id: &str) -> Result<(), BlossomError> {
    Decider::new(graph).authorize(user, &license_oa(id), &[Operation::OffboardLicense])
}

/// Require `checkout_license` on the agency and `view_license` on the
/// license.
pub fn authorize_checkout(graph: &Graph, user: &str, id: &str, agency: &str) -> Result<(), BlossomError> {
    let decider = Decider::new(graph);
    decider.authorize(user, &info_object(agency), &[Operation::CheckoutLicense])?;
    decider.authorize(user, &license_oa(id), &[Operation::ViewLicense])
}

/// Require `checkin_license` on the agency.
pub fn authorize_checkin(graph: &Graph, user: &str, agency: &str) -> Result<(), BlossomError> {
    Decider::new(graph).authorize(user, &info_object(agency), &[Operation::CheckinLicense])
}

/// Clear every field of `license` the caller may not view. Without
/// `view_license` the record becomes an empty shell.
pub fn filter_license(graph: &Graph, user: &str, license: &mut License) {
    let perms = permissions_on(graph, user, &license_oa(&license.id));
    if !perms.allows(Operation::ViewLicense) {
        *license = License::default();
        return;
    }
    if !perms.allows(Operation::ViewLicenseKeys) {
        license.all_keys.clear();
        license.available_keys.clear();
    }
    if !perms.allows(Operation::ViewCheckedOut) {
        license.checked_out.clear();
    }
}

/// Filter each license and drop the ones the caller cannot view.
pub fn filter_licenses(graph: &Graph, user: &str, licenses: Vec<License>) -> Vec<License> {
    licenses
        .into_iter()
        .filter_map(|mut l| {
            filter_license(graph, user, &mut l);
            (!l.id.is_empty()).then_some(l)
        })
        .collect()
}
