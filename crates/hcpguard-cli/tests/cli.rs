//! End-to-end CLI tests over the shared fixtures.
//!
//! These verify exit codes (0 pass, 2 policy or load failure, 1 runtime error), that every output
//! format renders, and that the JSON report validates against the published schema.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get a Command for the hcpguard binary, run from an empty directory so no
/// `hcpguard.toml` is picked up by accident.
#[allow(deprecated)]
fn hcpguard_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hcpguard").expect("hcpguard binary not found");
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

/// Get the path to the test fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("hcpguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

fn fixture(rel: &str) -> String {
    fixtures_dir().join(rel).display().to_string()
}

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON report")
}

fn report_schema(cwd: &Path) -> Value {
    let output = hcpguard_cmd(cwd)
        .arg("schema")
        .output()
        .expect("run schema");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("schema is JSON")
}

#[test]
fn secure_vault_config_passes() {
    let tmp = TempDir::new().expect("temp dir");
    hcpguard_cmd(tmp.path())
        .args(["vault", "--file", &fixture("vault/secure.hcl")])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("hcpguard: PASS"));
}

#[test]
fn insecure_vault_config_fails_with_a_valid_json_report() {
    let tmp = TempDir::new().expect("temp dir");
    let output = hcpguard_cmd(tmp.path())
        .args([
            "vault",
            "--file",
            &fixture("vault/insecure.hcl"),
            "--output",
            "json",
            "--verbose",
        ])
        .output()
        .expect("run hcpguard");
    assert_eq!(output.status.code(), Some(2));

    let report = json_stdout(&output);
    assert_eq!(report["schema"], "hcpguard.report.v1");
    assert_eq!(report["status"], "fail");
    assert_eq!(report["product"], "vault");

    let results = report["files"][0]["results"]
        .as_array()
        .expect("results array");
    let vlt001 = results
        .iter()
        .find(|r| r["rule_id"] == "VLT-001")
        .expect("VLT-001 evaluated");
    assert_eq!(vlt001["passed"], false);
    assert_eq!(vlt001["actual"], "file");

    let schema = report_schema(tmp.path());
    let validator = jsonschema::validator_for(&schema).expect("schema compiles");
    let errors: Vec<String> = validator.iter_errors(&report).map(|e| e.to_string()).collect();
    assert!(errors.is_empty(), "report does not match schema: {errors:?}");
}

#[test]
fn directory_scan_reports_load_failures_without_stopping() {
    let tmp = TempDir::new().expect("temp dir");
    let output = hcpguard_cmd(tmp.path())
        .args([
            "validate",
            &fixture("broken"),
            &fixture("consul"),
            "--output",
            "json",
        ])
        .output()
        .expect("run hcpguard");
    assert_eq!(output.status.code(), Some(2));

    let report = json_stdout(&output);
    assert_eq!(report["summary"]["files_total"], 2);
    assert_eq!(report["summary"]["files_failed"], 1);
    assert_eq!(report["files"][0]["outcome"], "failed");
    assert_eq!(report["files"][0]["kind"], "parse");
    assert_eq!(report["files"][1]["outcome"], "validated");
    assert_eq!(report["files"][1]["product"], "consul");
    assert_eq!(report["files"][1]["overall_status"], "pass");

    let schema = report_schema(tmp.path());
    let validator = jsonschema::validator_for(&schema).expect("schema compiles");
    assert!(validator.is_valid(&report));
}

#[test]
fn markdown_and_console_outputs() {
    let tmp = TempDir::new().expect("temp dir");
    hcpguard_cmd(tmp.path())
        .args(["nomad", "--directory", &fixture("nomad"), "--output", "md"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("# hcpguard report"))
        .stdout(predicate::str::contains("| NMD-001 | ACL system enabled | critical | FAIL |"));

    hcpguard_cmd(tmp.path())
        .args(["validate", &fixture("vault"), "--fail-level", "warning"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("FAIL    critical  VLT-001"));
}

#[test]
fn config_file_overrides_rule_policy() {
    let tmp = TempDir::new().expect("temp dir");
    std::fs::write(
        tmp.path().join("hcpguard.toml"),
        "[rules.VLT-001]\nenabled = false\n\n[rules.VLT-002]\nseverity = \"warning\"\n",
    )
    .expect("write config");

    hcpguard_cmd(tmp.path())
        .args(["vault", "--file", &fixture("vault/insecure.hcl")])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("VLT-001").not());

    // The command line wins over the config file.
    hcpguard_cmd(tmp.path())
        .args([
            "vault",
            "--file",
            &fixture("vault/insecure.hcl"),
            "--fail-level",
            "warning",
        ])
        .assert()
        .code(2);
}

#[test]
fn custom_rule_files_and_invalid_rule_sets() {
    let tmp = TempDir::new().expect("temp dir");
    let rules = tmp.path().join("team.yaml");
    std::fs::write(
        &rules,
        r#"
rules:
  - id: TEAM-001
    title: Seal configured
    product: vault
    severity: critical
    path: seal
    operator: exists
    message: no seal stanza
    remediation: configure auto-unseal
"#,
    )
    .expect("write rules");

    hcpguard_cmd(tmp.path())
        .args([
            "validate",
            &fixture("vault/insecure.hcl"),
            "--no-builtin-rules",
            "--rules",
            &rules.display().to_string(),
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("TEAM-001"))
        .stdout(predicate::str::contains("VLT-001").not());

    let bad = tmp.path().join("bad.yaml");
    std::fs::write(&bad, "- id: lowercase-1\n  operator: bogus\n").expect("write rules");
    hcpguard_cmd(tmp.path())
        .args([
            "validate",
            &fixture("vault"),
            "--rules",
            &bad.display().to_string(),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("hcpguard error: build rule registry"))
        .stderr(predicate::str::contains("invalid rule set"));
}

#[test]
fn missing_inputs_are_runtime_errors() {
    let tmp = TempDir::new().expect("temp dir");
    hcpguard_cmd(tmp.path())
        .args(["vault", "--file", "nope.hcl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a file: nope.hcl"));

    hcpguard_cmd(tmp.path())
        .args(["validate", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("discover configs under nope"));
}

#[test]
fn explain_known_and_unknown_rules() {
    let tmp = TempDir::new().expect("temp dir");
    hcpguard_cmd(tmp.path())
        .args(["explain", "VLT-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"))
        .stdout(predicate::str::contains("storage.type not_equals \"file\""));

    hcpguard_cmd(tmp.path())
        .args(["explain", "NOPE-999"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown rule id: NOPE-999"));
}

#[test]
fn schema_subcommand_prints_both_schemas() {
    let tmp = TempDir::new().expect("temp dir");
    assert_eq!(report_schema(tmp.path())["title"], "ScanReport");

    let output = hcpguard_cmd(tmp.path())
        .args(["schema", "config"])
        .output()
        .expect("run schema");
    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout).expect("schema is JSON");
    assert_eq!(schema["title"], "HcpguardConfigV1");
}
