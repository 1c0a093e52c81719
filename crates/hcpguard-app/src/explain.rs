//! The `explain` use case: look up documentation for a shipped rule.

use anyhow::Context;
use hcpguard_domain::{RuleDefinition, RuleRegistry};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found the rule.
    Found(RuleDefinition),
    /// Unknown identifier; includes the available rule ids.
    NotFound {
        identifier: String,
        available_rule_ids: Vec<String>,
    },
}

/// Look up a shipped rule by id (case-insensitive).
pub fn run_explain(identifier: &str) -> anyhow::Result<ExplainOutput> {
    let records = hcpguard_catalog::builtin_records().context("load shipped rules")?;
    let registry = RuleRegistry::build(records).context("build rule registry")?;

    let wanted = identifier.trim().to_ascii_uppercase();
    Ok(match registry.find(&wanted) {
        Some(rule) => ExplainOutput::Found(rule.definition().clone()),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rule_ids: registry
                .rules()
                .iter()
                .map(|r| r.definition().id.clone())
                .collect(),
        },
    })
}

/// Format a rule for terminal display.
pub fn format_explanation(def: &RuleDefinition) -> String {
    let mut out = String::new();

    let heading = format!("{}: {}", def.id, def.title);
    out.push_str(&heading);
    out.push('\n');
    out.push_str(&"=".repeat(heading.len()));
    out.push_str("\n\n");

    out.push_str(&format!("Product:  {}\n", def.product));
    out.push_str(&format!("Severity: {}\n", def.severity));
    match &def.expected {
        Some(expected) => out.push_str(&format!(
            "Check:    {} {} {}\n",
            def.path, def.operator, expected
        )),
        None => out.push_str(&format!("Check:    {} {}\n", def.path, def.operator)),
    }
    out.push('\n');

    out.push_str(&def.message);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(&def.remediation);
    out.push('\n');

    if let Some(reference) = &def.reference {
        out.push_str("\nReference: ");
        out.push_str(reference);
        out.push('\n');
    }

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, rule_ids: &[String]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule id: {}\n\n", identifier));
    out.push_str("Available rule ids:\n");
    for id in rule_ids {
        out.push_str(&format!("  - {}\n", id));
    }

    out
}
