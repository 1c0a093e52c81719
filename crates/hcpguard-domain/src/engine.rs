use crate::document::CanonicalDocument;
use crate::fingerprint::fingerprint_for_result;
use crate::operators;
use crate::policy::EffectiveConfig;
use crate::registry::{CompiledRule, RuleRegistry};
use crate::report::aggregate;
use hcpguard_types::{EvaluationResult, Product, ValidationReport};
use tracing::{debug, warn};

/// Evaluate every applicable, enabled rule against `doc`, in registry order.
///
/// A rule that cannot be evaluated yields a failed result carrying `evaluation_error`; it never
/// stops the remaining rules.
pub fn evaluate(
    doc: &CanonicalDocument,
    product: Product,
    registry: &RuleRegistry,
    cfg: &EffectiveConfig,
) -> Vec<EvaluationResult> {
    let target = doc.source().as_str();
    let mut results = Vec::new();

    for rule in registry.rules_for(product) {
        let def = rule.definition();
        let policy = cfg.rule_policy(&def.id);
        if !policy.enabled {
            debug!(rule_id = %def.id, path = %target, "rule disabled by policy");
            continue;
        }
        let severity = policy.severity.unwrap_or(def.severity);
        results.push(evaluate_rule(doc, product, rule, severity));
    }

    results
}

/// Evaluate and aggregate in one step.
pub fn validate(
    doc: &CanonicalDocument,
    product: Product,
    registry: &RuleRegistry,
    cfg: &EffectiveConfig,
) -> ValidationReport {
    let results = evaluate(doc, product, registry, cfg);
    aggregate(doc.source().clone(), product, cfg.fail_level, results)
}

fn evaluate_rule(
    doc: &CanonicalDocument,
    product: Product,
    rule: &CompiledRule,
    severity: hcpguard_types::Severity,
) -> EvaluationResult {
    let def = rule.definition();
    let target = doc.source().as_str();

    let mut result = EvaluationResult {
        rule_id: def.id.clone(),
        title: def.title.clone(),
        severity,
        operator: def.operator,
        path: def.path.clone(),
        passed: false,
        actual: None,
        note: None,
        evaluation_error: None,
        message: def.message.clone(),
        remediation: def.remediation.clone(),
        reference: def.reference.clone(),
        fingerprint: Some(fingerprint_for_result(&def.id, product, target)),
    };

    match rule.compiled() {
        Ok((query, expected)) => {
            let resolution = query.resolve(doc.root());
            let outcome = operators::evaluate(def.operator, &resolution, expected);
            result.passed = outcome.passed;
            result.note = outcome.note;
            result.actual = resolution.snapshot();
            debug!(rule_id = %def.id, path = %target, passed = result.passed, "rule evaluated");
        }
        Err(err) => {
            // Never report an unevaluable rule below what it declares.
            result.severity = severity.max(def.severity);
            result.evaluation_error = Some(err.clone());
            warn!(rule_id = %def.id, path = %target, code = %err.code, "rule could not be evaluated");
        }
    }

    result
}
