use hcpguard_types::Severity;
use std::collections::BTreeMap;

/// Per-rule policy layered over the registry's declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulePolicy {
    pub enabled: bool,
    /// Replaces the rule's declared severity when set.
    pub severity: Option<Severity>,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

impl RulePolicy {
    pub fn with_severity(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity: Some(severity),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// Minimum failed severity that fails a report.
    pub fail_level: Severity,
    pub rules: BTreeMap<String, RulePolicy>,
}

impl EffectiveConfig {
    pub fn with_fail_level(fail_level: Severity) -> Self {
        Self {
            fail_level,
            rules: BTreeMap::new(),
        }
    }

    pub fn rule_policy(&self, rule_id: &str) -> RulePolicy {
        self.rules.get(rule_id).cloned().unwrap_or_default()
    }
}
