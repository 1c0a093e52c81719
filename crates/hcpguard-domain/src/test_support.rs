use crate::document::{CanonicalDocument, Format};
use crate::registry::{RawRule, RuleRegistry};
use hcpguard_types::{EvaluationResult, Operator, Severity, TargetPath, Value};

pub fn raw_rule(
    id: &str,
    product: &str,
    path: &str,
    operator: &str,
    expected: Option<Value>,
) -> RawRule {
    let mut record = RawRule::new();
    for (key, value) in [
        ("id", id),
        ("title", "test rule"),
        ("product", product),
        ("severity", "critical"),
        ("path", path),
        ("operator", operator),
        ("message", "rule failed"),
        ("remediation", "fix it"),
    ] {
        record.insert(key.to_string(), Value::from(value));
    }
    if let Some(expected) = expected {
        record.insert("expected".to_string(), expected);
    }
    record
}

pub fn registry(records: Vec<RawRule>) -> RuleRegistry {
    RuleRegistry::build(records).expect("valid test rules")
}

pub fn doc(json: &str) -> CanonicalDocument {
    let root: Value = serde_json::from_str(json).expect("valid json");
    CanonicalDocument::new(root, TargetPath::new("test.json"), Format::Json)
}

pub fn result(rule_id: &str, severity: Severity, passed: bool) -> EvaluationResult {
    EvaluationResult {
        rule_id: rule_id.to_string(),
        title: "test rule".to_string(),
        severity,
        operator: Operator::Exists,
        path: "a".to_string(),
        passed,
        actual: None,
        note: None,
        evaluation_error: None,
        message: "rule failed".to_string(),
        remediation: "fix it".to_string(),
        reference: None,
        fingerprint: None,
    }
}
