//! # Agency Graph Layout
//!
//! Written by `request_account` for agency `a` with MSP id `m`:
//!
//! ```text
//!   UA a_ua ◀── agencies_ua
//!   ├── UA a_system_owner            ◀── U <system owner>:m
//!   ├── UA a_acquisition_specialist  ◀── U <acquisition specialist>:m
//!   └── UA a_system_administrator    ◀── U <system administrator>:m
//!   OA a_oa ◀── agencies
//!   └── O  a_info
//!
//!   a_ua                   ──{view_agency, view_ato, view_mspid, view_users,
//!                             view_status, view_agency_licenses, view_swid}──▶ a_oa
//!   a_system_owner         ──{upload_ato}──▶ a_oa
//!   a_system_administrator ──{checkout_license, checkin_license, report_swid}──▶ a_oa
//! ```
//!
//! Approval adds `a_ua` to `approved_agencies_ua`, which can view licenses.

use std::collections::BTreeMap;

use blossom_core::{BlossomError, Operation};
use blossom_ngac::{execute, Graph, GraphCommand, NodeType};
use blossom_state::{Agency, Users};

use super::bootstrap::{AGENCIES_OA, AGENCIES_UA, APPROVED_AGENCIES_UA};
use super::{associate, create};

/// The agency's user attribute.
pub fn ua_name(agency: &str) -> String {
    format!("{agency}_ua")
}

/// The agency's object attribute.
pub fn oa_name(agency: &str) -> String {
    format!("{agency}_oa")
}

/// The object agency-level rights are checked on.
pub fn info_object(agency: &str) -> String {
    format!("{agency}_info")
}

/// Role user attribute of the system owner.
pub fn system_owner_ua(agency: &str) -> String {
    format!("{agency}_system_owner")
}

/// Role user attribute of the acquisition specialist.
pub fn acquisition_specialist_ua(agency: &str) -> String {
    format!("{agency}_acquisition_specialist")
}

/// Role user attribute of the system administrator.
pub fn system_administrator_ua(agency: &str) -> String {
    format!("{agency}_system_administrator")
}

/// Graph user name of an agency user.
pub fn user_node(common_name: &str, mspid: &str) -> String {
    format!("{common_name}:{mspid}")
}

const MEMBER_OPS: [Operation; 7] = [
    Operation::ViewAgency,
    Operation::ViewAto,
    Operation::ViewMspid,
    Operation::ViewUsers,
    Operation::ViewStatus,
    Operation::ViewAgencyLicenses,
    Operation::ViewSwid,
];

const SYSTEM_OWNER_OPS: [Operation; 1] = [Operation::UploadAto];

const SYSTEM_ADMINISTRATOR_OPS: [Operation; 3] = [
    Operation::CheckoutLicense,
    Operation::CheckinLicense,
    Operation::ReportSwid,
];

fn op_strs(ops: &[Operation]) -> Vec<&'static str> {
    ops.iter().map(Operation::as_str).collect()
}

/// Write the layout of a newly requested agency.
pub fn request_account(graph: &mut Graph, agency: &Agency) -> Result<(), BlossomError> {
    let name = agency.name.as_str();
    let ua = ua_name(name);
    let oa = oa_name(name);
    let roles = [
        system_owner_ua(name),
        acquisition_specialist_ua(name),
        system_administrator_ua(name),
    ];

    let mut commands = vec![create(&ua, NodeType::UserAttribute, &[AGENCIES_UA])];
    for role in &roles {
        commands.push(create(role, NodeType::UserAttribute, &[&ua]));
    }

    // One person may fill several roles; their user node joins each.
    let Users {
        system_owner,
        acquisition_specialist,
        system_administrator,
    } = &agency.users;
    let mut members: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (user, role) in [system_owner, acquisition_specialist, system_administrator]
        .into_iter()
        .zip(roles.iter())
    {
        members
            .entry(user_node(user, &agency.mspid))
            .or_default()
            .push(role.as_str());
    }
    for (user, parents) in &members {
        commands.push(create(user, NodeType::User, parents));
    }

    commands.push(create(&oa, NodeType::ObjectAttribute, &[AGENCIES_OA]));
    commands.push(create(info_object(name), NodeType::Object, &[&oa]));
    commands.push(associate(&ua, &oa, &op_strs(&MEMBER_OPS)));
    commands.push(associate(&roles[0], &oa, &op_strs(&SYSTEM_OWNER_OPS)));
    commands.push(associate(&roles[2], &oa, &op_strs(&SYSTEM_ADMINISTRATOR_OPS)));

    execute(graph, &commands)
}

/// Add the agency to, or remove it from, the approved agencies.
pub fn set_approved(graph: &mut Graph, agency: &str, approved: bool) -> Result<(), BlossomError> {
    let ua = ua_name(agency);
    let currently = graph.is_assigned(&ua, APPROVED_AGENCIES_UA);
    let command = match (approved, currently) {
        (true, false) => GraphCommand::Assign {
            child: ua,
            parent: APPROVED_AGENCIES_UA.to_string(),
        },
        (false, true) => GraphCommand::Deassign {
            child: ua,
            parent: APPROVED_AGENCIES_UA.to_string(),
        },
        _ => return Ok(()),
    };
    execute(graph, &[command])
}
