//! # Contract Flow
//!
//! Drives the contract through [`Blossom::invoke`] against an in-memory
//! ledger, the way a peer would: one transaction per call, identities
//! supplied by the caller.

use blossom_chaincode::{Blossom, ContractConfig, ErrorCode};
use blossom_core::{BlossomError, Timestamp};
use blossom_ledger::{ClientIdentity, MemoryLedger, StaticIdentity};
use blossom_ngac::{Graph, NodeType};
use blossom_state::{AgencyStatus, SwId, Users};

const ADMIN: (&str, &str) = ("admin", "Org1MSP");
const SO: (&str, &str) = ("a1_so", "A1MSP");
const SA: (&str, &str) = ("a1_sa", "A1MSP");
const OUTSIDER: (&str, &str) = ("mallory", "XMSP");

fn who((cn, msp): (&str, &str)) -> StaticIdentity {
    StaticIdentity::new(cn, msp)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

fn keys(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("k{i}")).collect()
}

/// A deployed contract with one approved agency `a1` and license `l1`
/// holding five keys.
fn deployed() -> (Blossom, MemoryLedger) {
    init_tracing();
    let contract = Blossom::new(ContractConfig {
        admin: ClientIdentity::new(ADMIN.0, ADMIN.1),
    });
    let ledger = MemoryLedger::new();

    contract
        .invoke(&ledger, &who(ADMIN), "init_ngac", |c, ctx| c.init_ngac(ctx))
        .unwrap();
    contract
        .invoke(&ledger, &who(SO), "request_account", |c, ctx| {
            c.request_account(ctx, "a1", "A1MSP", Users::new("a1_so", "a1_acq", "a1_sa"))
        })
        .unwrap();
    contract
        .invoke(&ledger, &who(ADMIN), "update_agency_status", |c, ctx| {
            c.update_agency_status(ctx, "a1", AgencyStatus::Approved)
        })
        .unwrap();
    contract
        .invoke(&ledger, &who(ADMIN), "onboard_license", |c, ctx| {
            c.onboard_license(ctx, "l1", "CAD Suite", keys(5))
        })
        .unwrap();
    (contract, ledger)
}

// ── Bootstrap ───────────────────────────────────────────────────────

#[test]
fn init_is_admin_only_and_runs_once() {
    init_tracing();
    let contract = Blossom::new(ContractConfig {
        admin: ClientIdentity::new(ADMIN.0, ADMIN.1),
    });
    let ledger = MemoryLedger::new();

    let err = contract
        .invoke(&ledger, &who(OUTSIDER), "init_ngac", |c, ctx| c.init_ngac(ctx))
        .unwrap_err();
    assert!(err.is_access_denied());
    assert!(ledger.is_empty());

    contract
        .invoke(&ledger, &who(ADMIN), "init_ngac", |c, ctx| c.init_ngac(ctx))
        .unwrap();
    let err = contract
        .invoke(&ledger, &who(ADMIN), "init_ngac", |c, ctx| c.init_ngac(ctx))
        .unwrap_err();
    assert_eq!(ErrorCode::of(&err), ErrorCode::AlreadyExists);
}

#[test]
fn operations_before_init_report_missing_graph() {
    init_tracing();
    let contract = Blossom::new(ContractConfig {
        admin: ClientIdentity::new(ADMIN.0, ADMIN.1),
    });
    let ledger = MemoryLedger::new();
    let err = contract
        .invoke(&ledger, &who(ADMIN), "licenses", |c, ctx| c.licenses(ctx))
        .unwrap_err();
    assert!(matches!(err, BlossomError::NotFound(_)));
}

// ── Agencies ────────────────────────────────────────────────────────

#[test]
fn duplicate_account_request_is_rejected() {
    let (contract, ledger) = deployed();
    let err = contract
        .invoke(&ledger, &who(OUTSIDER), "request_account", |c, ctx| {
            c.request_account(ctx, "a1", "XMSP", Users::new("x", "y", "z"))
        })
        .unwrap_err();
    assert!(matches!(err, BlossomError::AlreadyExists(_)));
}

#[test]
fn account_request_needs_every_field() {
    let (contract, ledger) = deployed();
    let err = contract
        .invoke(&ledger, &who(OUTSIDER), "request_account", |c, ctx| {
            c.request_account(ctx, "a2", "A2MSP", Users::new("so", "", "sa"))
        })
        .unwrap_err();
    assert!(matches!(err, BlossomError::Validation(_)));
}

#[test]
fn agency_views_depend_on_membership() {
    let (contract, ledger) = deployed();

    let own = contract
        .invoke(&ledger, &who(SO), "agency", |c, ctx| c.agency(ctx, "a1"))
        .unwrap();
    assert_eq!(own.mspid, "A1MSP");
    assert_eq!(own.status, Some(AgencyStatus::Approved));

    let shell = contract
        .invoke(&ledger, &who(OUTSIDER), "agency", |c, ctx| c.agency(ctx, "a1"))
        .unwrap();
    assert!(shell.name.is_empty());
    assert!(contract
        .invoke(&ledger, &who(OUTSIDER), "agencies", |c, ctx| c.agencies(ctx))
        .unwrap()
        .is_empty());
    assert_eq!(
        contract
            .invoke(&ledger, &who(ADMIN), "agencies", |c, ctx| c.agencies(ctx))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn ato_upload_is_system_owner_only() {
    let (contract, ledger) = deployed();
    let err = contract
        .invoke(&ledger, &who(SA), "upload_ato", |c, ctx| c.upload_ato(ctx, "a1", "ato-v1"))
        .unwrap_err();
    assert!(err.is_access_denied());

    contract
        .invoke(&ledger, &who(SO), "upload_ato", |c, ctx| c.upload_ato(ctx, "a1", "ato-v1"))
        .unwrap();
    let a1 = contract
        .invoke(&ledger, &who(SO), "agency", |c, ctx| c.agency(ctx, "a1"))
        .unwrap();
    assert_eq!(a1.ato, "ato-v1");
}

#[test]
fn revoking_approval_withdraws_license_visibility() {
    let (contract, ledger) = deployed();
    assert_eq!(
        contract
            .invoke(&ledger, &who(SA), "licenses", |c, ctx| c.licenses(ctx))
            .unwrap()
            .len(),
        1
    );

    let err = contract
        .invoke(&ledger, &who(SO), "update_agency_status", |c, ctx| {
            c.update_agency_status(ctx, "a1", AgencyStatus::InactiveOptOut)
        })
        .unwrap_err();
    assert!(err.is_access_denied());

    contract
        .invoke(&ledger, &who(ADMIN), "update_agency_status", |c, ctx| {
            c.update_agency_status(ctx, "a1", AgencyStatus::InactiveSecurityRisk)
        })
        .unwrap();
    assert!(contract
        .invoke(&ledger, &who(SA), "licenses", |c, ctx| c.licenses(ctx))
        .unwrap()
        .is_empty());
}

// ── Licenses ────────────────────────────────────────────────────────

#[test]
fn onboarding_is_admin_only_and_unique() {
    let (contract, ledger) = deployed();
    let err = contract
        .invoke(&ledger, &who(SA), "onboard_license", |c, ctx| {
            c.onboard_license(ctx, "l2", "Other", keys(2))
        })
        .unwrap_err();
    assert!(err.is_access_denied());

    let err = contract
        .invoke(&ledger, &who(ADMIN), "onboard_license", |c, ctx| {
            c.onboard_license(ctx, "l1", "Again", keys(2))
        })
        .unwrap_err();
    assert!(matches!(err, BlossomError::AlreadyExists(_)));
}

#[test]
fn license_view_hides_keys_from_agencies() {
    let (contract, ledger) = deployed();

    let full = contract
        .invoke(&ledger, &who(ADMIN), "license_info", |c, ctx| c.license_info(ctx, "l1"))
        .unwrap();
    assert_eq!(full.all_keys, keys(5));

    let partial = contract
        .invoke(&ledger, &who(SA), "license_info", |c, ctx| c.license_info(ctx, "l1"))
        .unwrap();
    assert_eq!(partial.id, "l1");
    assert_eq!(partial.available, 5);
    assert!(partial.all_keys.is_empty());
    assert!(partial.available_keys.is_empty());

    let err = contract
        .invoke(&ledger, &who(ADMIN), "license_info", |c, ctx| c.license_info(ctx, "nope"))
        .unwrap_err();
    assert!(matches!(err, BlossomError::NotFound(_)));
}

#[test]
fn checkout_then_checkin_round_trip() {
    let (contract, ledger) = deployed();
    let before = Timestamp::now();

    let taken = contract
        .invoke(&ledger, &who(SA), "checkout_license", |c, ctx| {
            c.checkout_license(ctx, "l1", "a1", 2)
        })
        .unwrap();
    assert_eq!(taken.keys().cloned().collect::<Vec<_>>(), vec!["k1", "k2"]);
    let year_out = before.plus_years(1).unwrap();
    assert!(taken.values().all(|exp| *exp >= year_out));

    let license = contract
        .invoke(&ledger, &who(ADMIN), "license_info", |c, ctx| c.license_info(ctx, "l1"))
        .unwrap();
    assert_eq!(license.available, 3);
    assert_eq!(license.available_keys, vec!["k3", "k4", "k5"]);
    assert_eq!(license.checked_out.get("a1"), Some(&taken));

    let agency = contract
        .invoke(&ledger, &who(SO), "agency", |c, ctx| c.agency(ctx, "a1"))
        .unwrap();
    assert_eq!(agency.assets.get("l1"), Some(&taken));

    let graph = Graph::from_document(
        contract
            .invoke(&ledger, &who(ADMIN), "graph", |c, ctx| c.graph(ctx))
            .unwrap(),
    )
    .unwrap();
    assert!(graph.is_assigned("license:l1:key:k1", "a1_oa"));

    let returned = vec!["k2".to_string()];
    contract
        .invoke(&ledger, &who(SA), "checkin_license", |c, ctx| {
            c.checkin_license(ctx, "l1", &returned, "a1")
        })
        .unwrap();
    let license = contract
        .invoke(&ledger, &who(ADMIN), "license_info", |c, ctx| c.license_info(ctx, "l1"))
        .unwrap();
    assert_eq!(license.available, 4);
    assert_eq!(license.available_keys, vec!["k3", "k4", "k5", "k2"]);
}

#[test]
fn failed_checkout_changes_nothing() {
    let (contract, ledger) = deployed();
    let sequence = ledger.sequence();

    let err = contract
        .invoke(&ledger, &who(SA), "checkout_license", |c, ctx| {
            c.checkout_license(ctx, "l1", "a1", 6)
        })
        .unwrap_err();
    assert!(matches!(err, BlossomError::InvalidAmount { requested: 6, available: 5, .. }));

    let err = contract
        .invoke(&ledger, &who(SO), "checkout_license", |c, ctx| {
            c.checkout_license(ctx, "l1", "a1", 1)
        })
        .unwrap_err();
    assert!(err.is_access_denied());

    assert_eq!(ledger.sequence(), sequence);
}

#[test]
fn checkin_of_unheld_key_names_the_key() {
    let (contract, ledger) = deployed();
    contract
        .invoke(&ledger, &who(SA), "checkout_license", |c, ctx| {
            c.checkout_license(ctx, "l1", "a1", 1)
        })
        .unwrap();

    let bogus = vec!["k1".to_string(), "k4".to_string()];
    let err = contract
        .invoke(&ledger, &who(SA), "checkin_license", |c, ctx| {
            c.checkin_license(ctx, "l1", &bogus, "a1")
        })
        .unwrap_err();
    match err {
        BlossomError::InconsistentState(msg) => assert!(msg.contains("k4")),
        other => panic!("unexpected error: {other}"),
    }

    let license = contract
        .invoke(&ledger, &who(ADMIN), "license_info", |c, ctx| c.license_info(ctx, "l1"))
        .unwrap();
    assert_eq!(license.available, 4);
}

#[test]
fn offboard_is_gated_and_tolerates_unknown_ids() {
    let (contract, ledger) = deployed();
    contract
        .invoke(&ledger, &who(SA), "offboard_license", |c, ctx| {
            c.offboard_license(ctx, "ghost")
        })
        .unwrap();

    let err = contract
        .invoke(&ledger, &who(SA), "offboard_license", |c, ctx| c.offboard_license(ctx, "l1"))
        .unwrap_err();
    assert!(err.is_access_denied());

    contract
        .invoke(&ledger, &who(ADMIN), "offboard_license", |c, ctx| c.offboard_license(ctx, "l1"))
        .unwrap();
    assert!(contract
        .invoke(&ledger, &who(ADMIN), "licenses", |c, ctx| c.licenses(ctx))
        .unwrap()
        .is_empty());
}

// ── SwIDs ───────────────────────────────────────────────────────────

#[test]
fn swid_report_requires_a_held_key() {
    let (contract, ledger) = deployed();
    contract
        .invoke(&ledger, &who(SA), "checkout_license", |c, ctx| {
            c.checkout_license(ctx, "l1", "a1", 1)
        })
        .unwrap();

    let unheld = SwId::new("tag-x", "<SoftwareIdentity/>", "l1", "k5", "");
    let err = contract
        .invoke(&ledger, &who(SA), "report_swid", |c, ctx| c.report_swid(ctx, unheld, "a1"))
        .unwrap_err();
    assert!(matches!(err, BlossomError::NotFound(_)));

    let tag = SwId::new("tag-1", "<SoftwareIdentity/>", "l1", "k1", "");
    contract
        .invoke(&ledger, &who(SA), "report_swid", |c, ctx| c.report_swid(ctx, tag.clone(), "a1"))
        .unwrap();
    let err = contract
        .invoke(&ledger, &who(SA), "report_swid", |c, ctx| c.report_swid(ctx, tag.clone(), "a1"))
        .unwrap_err();
    assert!(matches!(err, BlossomError::AlreadyExists(_)));

    let seen = contract
        .invoke(&ledger, &who(SO), "swid", |c, ctx| c.swid(ctx, "tag-1"))
        .unwrap();
    assert_eq!(seen.agency, "a1");
    assert_eq!(seen.license, "k1");

    let hidden = contract
        .invoke(&ledger, &who(OUTSIDER), "swid", |c, ctx| c.swid(ctx, "tag-1"))
        .unwrap();
    assert!(hidden.primary_tag.is_empty());

    let listed = contract
        .invoke(&ledger, &who(SO), "swids_for_license", |c, ctx| c.swids_for_license(ctx, "l1"))
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert!(contract
        .invoke(&ledger, &who(SO), "swids_for_license", |c, ctx| c.swids_for_license(ctx, "l2"))
        .unwrap()
        .is_empty());
}

#[test]
fn existence_checks_precede_authorization() {
    let (contract, ledger) = deployed();
    contract
        .invoke(&ledger, &who(SA), "checkout_license", |c, ctx| {
            c.checkout_license(ctx, "l1", "a1", 1)
        })
        .unwrap();
    let tag = SwId::new("tag-1", "<SoftwareIdentity/>", "l1", "k1", "");
    contract
        .invoke(&ledger, &who(SA), "report_swid", |c, ctx| c.report_swid(ctx, tag.clone(), "a1"))
        .unwrap();

    contract
        .invoke(&ledger, &who(OUTSIDER), "offboard_license", |c, ctx| {
            c.offboard_license(ctx, "ghost")
        })
        .unwrap();
    let err = contract
        .invoke(&ledger, &who(OUTSIDER), "offboard_license", |c, ctx| c.offboard_license(ctx, "l1"))
        .unwrap_err();
    assert!(err.is_access_denied());

    let err = contract
        .invoke(&ledger, &who(OUTSIDER), "report_swid", |c, ctx| c.report_swid(ctx, tag.clone(), "a1"))
        .unwrap_err();
    assert!(matches!(err, BlossomError::AlreadyExists(_)));
    let fresh = SwId::new("tag-2", "<SoftwareIdentity/>", "l1", "k1", "");
    let err = contract
        .invoke(&ledger, &who(OUTSIDER), "report_swid", |c, ctx| c.report_swid(ctx, fresh, "a1"))
        .unwrap_err();
    assert!(err.is_access_denied());
}

// ── Graph administration ────────────────────────────────────────────

fn current_graph(contract: &Blossom, ledger: &MemoryLedger) -> Graph {
    let doc = contract
        .invoke(ledger, &who(ADMIN), "graph", |c, ctx| c.graph(ctx))
        .unwrap();
    Graph::from_document(doc).unwrap()
}

#[test]
fn graph_export_needs_view_graph() {
    let (contract, ledger) = deployed();
    let err = contract
        .invoke(&ledger, &who(SO), "graph", |c, ctx| c.graph(ctx))
        .unwrap_err();
    assert!(err.is_access_denied());
}

#[test]
fn update_graph_is_rejected_in_full_on_one_denial() {
    let (contract, ledger) = deployed();

    // Give a1's system owner `create_node` on a1_oa, and nothing else.
    let mut desired = current_graph(&contract, &ledger);
    desired
        .create_assigned("a1_editors", NodeType::UserAttribute, &["a1_ua"])
        .unwrap();
    desired.assign("a1_so:A1MSP", "a1_editors").unwrap();
    desired.associate("a1_editors", "a1_oa", ["create_node"]).unwrap();
    let applied = contract
        .invoke(&ledger, &who(ADMIN), "update_graph", |c, ctx| {
            c.update_graph(ctx, &desired.to_json()?)
        })
        .unwrap();
    assert!(applied.commands > 0);
    assert_ne!(applied.before, applied.after);
    assert_eq!(applied.after, current_graph(&contract, &ledger).digest().unwrap());

    let before = current_graph(&contract, &ledger);
    let sequence = ledger.sequence();

    let mut desired = before.clone();
    desired
        .create_assigned("a1_notes", NodeType::Object, &["a1_oa"])
        .unwrap();
    desired
        .create_assigned("rogue_license", NodeType::ObjectAttribute, &["licenses"])
        .unwrap();
    let err = contract
        .invoke(&ledger, &who(SO), "update_graph", |c, ctx| {
            c.update_graph(ctx, &desired.to_json()?)
        })
        .unwrap_err();
    assert!(err.is_access_denied());
    assert_eq!(ledger.sequence(), sequence);
    assert_eq!(current_graph(&contract, &ledger), before);

    let mut allowed = before.clone();
    allowed
        .create_assigned("a1_notes", NodeType::Object, &["a1_oa"])
        .unwrap();
    let applied = contract
        .invoke(&ledger, &who(SO), "update_graph", |c, ctx| {
            c.update_graph(ctx, &allowed.to_json()?)
        })
        .unwrap();
    assert_eq!(applied.commands, 1);
    assert!(current_graph(&contract, &ledger).exists("a1_notes"));
}

#[test]
fn update_graph_to_current_is_a_no_op() {
    let (contract, ledger) = deployed();
    let graph = current_graph(&contract, &ledger);
    let json = graph.to_json().unwrap();
    let applied = contract
        .invoke(&ledger, &who(ADMIN), "update_graph", |c, ctx| c.update_graph(ctx, &json))
        .unwrap();
    assert_eq!(applied.commands, 0);
    assert_eq!(applied.before, graph.digest().unwrap());
    assert_eq!(applied.after, applied.before);
}

// ── Transactions ────────────────────────────────────────────────────

#[test]
fn failing_operation_rolls_back_earlier_writes() {
    let (contract, ledger) = deployed();
    let sequence = ledger.sequence();

    // The license write succeeds inside the transaction, then the
    // checkout fails; neither reaches the ledger.
    let err = contract
        .invoke(&ledger, &who(ADMIN), "batch", |c, ctx| {
            c.onboard_license(ctx, "l2", "Viewer", keys(1))?;
            c.checkout_license(ctx, "l2", "a1", 2)
        })
        .unwrap_err();
    assert!(matches!(err, BlossomError::InvalidAmount { .. }));
    assert_eq!(ledger.sequence(), sequence);
    let ids: Vec<_> = contract
        .invoke(&ledger, &who(ADMIN), "licenses", |c, ctx| c.licenses(ctx))
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec!["l1"]);
}
