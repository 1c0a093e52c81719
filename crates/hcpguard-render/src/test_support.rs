use hcpguard_types::{
    EvaluationError, EvaluationResult, FailureKind, FileFailure, FileReport, Operator,
    OverallStatus, Product, ResultCounts, ScanReport, Severity, SeverityCounts, TargetPath,
    ToolMeta, ValidationReport, Value,
};
use time::OffsetDateTime;

fn result(id: &str, title: &str, severity: Severity, passed: bool) -> EvaluationResult {
    EvaluationResult {
        rule_id: id.to_string(),
        title: title.to_string(),
        severity,
        operator: Operator::Equals,
        path: "storage.type".to_string(),
        passed,
        actual: Some(Value::from("file")),
        note: None,
        evaluation_error: None,
        message: format!("{title} check failed."),
        remediation: format!("Fix {id}."),
        reference: None,
        fingerprint: None,
    }
}

/// One failing file, one passing file, one unreadable file.
pub(crate) fn sample_report() -> ScanReport {
    let mut storage = result("VLT-001", "Storage backend is not file", Severity::Critical, false);
    storage.reference = Some("https://example.com/storage".to_string());

    let mut pattern = result("VLT-009", "TTL | pattern", Severity::Warning, false);
    pattern.operator = Operator::Regex;
    pattern.evaluation_error = Some(EvaluationError {
        code: "invalid_pattern".to_string(),
        message: "invalid regex '('".to_string(),
    });

    let mut mlock = result("VLT-004", "Memory lock enabled", Severity::Warning, false);
    mlock.operator = Operator::Gt;
    mlock.note = Some("type_mismatch: cannot order a list value".to_string());

    let ui = result("VLT-006", "Web UI disabled", Severity::Info, true);

    let insecure = ValidationReport {
        target: TargetPath::new("vault/insecure.hcl"),
        product: Product::Vault,
        fail_level: Severity::Critical,
        overall_status: OverallStatus::Fail,
        counts: ResultCounts {
            total: 4,
            passed: 1,
            failed: 3,
            errored: 1,
            passed_by_severity: SeverityCounts {
                info: 1,
                warning: 0,
                critical: 0,
            },
            failed_by_severity: SeverityCounts {
                info: 0,
                warning: 2,
                critical: 1,
            },
        },
        results: vec![storage, pattern, mlock, ui],
    };

    let clean = ValidationReport {
        target: TargetPath::new("nomad/client.hcl"),
        product: Product::Nomad,
        fail_level: Severity::Critical,
        overall_status: OverallStatus::Pass,
        counts: ResultCounts::default(),
        results: Vec::new(),
    };

    let broken = FileFailure {
        target: TargetPath::new("broken/bad.json"),
        kind: FailureKind::Parse,
        message: "invalid json at line 4, column 3: trailing comma".to_string(),
        location: None,
    };

    ScanReport::from_files(
        ToolMeta {
            name: "hcpguard".to_string(),
            version: "0.1.0".to_string(),
        },
        OffsetDateTime::UNIX_EPOCH,
        OffsetDateTime::UNIX_EPOCH,
        None,
        Severity::Critical,
        vec![
            FileReport::Validated(insecure),
            FileReport::Validated(clean),
            FileReport::Failed(broken),
        ],
    )
}
