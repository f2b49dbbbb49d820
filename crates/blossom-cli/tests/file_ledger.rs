//! # File-Backed Ledger
//!
//! Runs CLI commands one process invocation at a time against a snapshot
//! in a temporary directory, the way an operator would.

use std::path::Path;

use blossom_chaincode::ErrorCode;
use blossom_cli::config::CliConfig;
use blossom_cli::{render_error, run, Cli};
use blossom_ledger::{ClientIdentity, MemoryLedger};
use clap::Parser;
use serde_json::Value;

fn config(dir: &Path) -> CliConfig {
    CliConfig {
        ledger_path: dir.join("ledger.json"),
        admin: ClientIdentity::new("admin", "Org1MSP"),
    }
}

fn blossom(config: &CliConfig, args: &[&str]) -> anyhow::Result<Value> {
    let cli = Cli::try_parse_from(std::iter::once("blossom").chain(args.iter().copied()))?;
    run(cli, config)
}

fn bootstrap(config: &CliConfig) {
    blossom(config, &["graph", "init"]).unwrap();
    blossom(
        config,
        &[
            "--user", "a1_so", "--msp", "A1MSP",
            "agency", "request", "a1",
            "--mspid", "A1MSP",
            "--system-owner", "a1_so",
            "--acquisition-specialist", "a1_acq",
            "--system-administrator", "a1_sa",
        ],
    )
    .unwrap();
    blossom(config, &["agency", "status", "a1", "approved"]).unwrap();
    blossom(config, &["license", "onboard", "l1", "--name", "CAD Suite", "--keys", "k1,k2,k3"]).unwrap();
}

#[test]
fn state_survives_between_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    bootstrap(&config);
    assert!(config.ledger_path.exists());

    let taken = blossom(
        &config,
        &["--user", "a1_sa", "--msp", "A1MSP", "license", "checkout", "l1", "--agency", "a1", "--amount", "2"],
    )
    .unwrap();
    let keys: Vec<&str> = taken.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["k1", "k2"]);

    let license = blossom(&config, &["license", "show", "l1"]).unwrap();
    assert_eq!(license["available"], 1);
    assert_eq!(license["available_keys"], serde_json::json!(["k3"]));

    let agencies = blossom(&config, &["--user", "a1_so", "--msp", "A1MSP", "agency", "list"]).unwrap();
    assert_eq!(agencies.as_array().unwrap().len(), 1);
    assert_eq!(agencies[0]["status"], "Approved");
}

#[test]
fn failures_leave_the_snapshot_alone() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    bootstrap(&config);
    let before = std::fs::read(&config.ledger_path).unwrap();

    let err = blossom(
        &config,
        &["--user", "a1_so", "--msp", "A1MSP", "license", "checkout", "l1", "--agency", "a1", "--amount", "1"],
    )
    .unwrap_err();
    let (body, status) = render_error(&err);
    assert_eq!(body.error.code, ErrorCode::Forbidden);
    assert_eq!(status, 5);

    let err = blossom(
        &config,
        &["--user", "a1_sa", "--msp", "A1MSP", "license", "checkout", "l1", "--agency", "a1", "--amount", "9"],
    )
    .unwrap_err();
    assert_eq!(render_error(&err).0.error.code, ErrorCode::Invalid);

    assert_eq!(std::fs::read(&config.ledger_path).unwrap(), before);
}

#[test]
fn reads_do_not_rewrite_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    bootstrap(&config);
    let sequence = MemoryLedger::open(&config.ledger_path).unwrap().sequence();

    blossom(&config, &["license", "list"]).unwrap();
    blossom(&config, &["graph", "show"]).unwrap();

    assert_eq!(MemoryLedger::open(&config.ledger_path).unwrap().sequence(), sequence);
}

#[test]
fn graph_update_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    bootstrap(&config);

    let mut doc = blossom(&config, &["graph", "show"]).unwrap();
    doc["nodes"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!({"name": "audit_oa", "type": "OA"}));
    doc["assignments"]["audit_oa"] = serde_json::json!(["blossom_oa"]);
    let path = dir.path().join("desired.json");
    std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    let out = blossom(&config, &["graph", "update", path.to_str().unwrap()]).unwrap();
    assert_eq!(out["commands_applied"], 1);
    assert_ne!(out["digest_before"], out["digest_after"]);
    assert!(out["digest_after"].as_str().unwrap().starts_with("sha256:"));

    let err = blossom(
        &config,
        &["--user", "a1_sa", "--msp", "A1MSP", "graph", "show"],
    )
    .unwrap_err();
    assert_eq!(render_error(&err).0.error.code, ErrorCode::Forbidden);
}

#[test]
fn swid_report_reads_xml_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    bootstrap(&config);
    blossom(
        &config,
        &["--user", "a1_sa", "--msp", "A1MSP", "license", "checkout", "l1", "--agency", "a1", "--amount", "1"],
    )
    .unwrap();

    let xml = dir.path().join("tag.xml");
    std::fs::write(&xml, "<SoftwareIdentity name=\"CAD\"/>").unwrap();
    blossom(
        &config,
        &[
            "--user", "a1_sa", "--msp", "A1MSP",
            "swid", "report", "tag-1",
            "--agency", "a1", "--license", "l1", "--key", "k1",
            "--xml", xml.to_str().unwrap(),
        ],
    )
    .unwrap();

    let listed = blossom(&config, &["swid", "list", "--license", "l1"]).unwrap();
    assert_eq!(listed[0]["xml"], "<SoftwareIdentity name=\"CAD\"/>");
}
