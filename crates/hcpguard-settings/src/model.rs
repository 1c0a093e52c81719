use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `hcpguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HcpguardConfigV1 {
    /// Optional schema string for tooling (`hcpguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Lowest failed severity that fails a file: `info`, `warning`, or `critical` (default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_level: Option<String>,

    /// Fill in documented product defaults before evaluating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject_defaults: Option<bool>,

    /// Evaluate the shipped rule sets (default `true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin_rules: Option<bool>,

    /// Extra YAML rule files, relative to the config file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_files: Vec<String>,

    /// Glob patterns excluded from directory scans.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Map of rule id -> policy.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Replaces the declared severity: `info`, `warning`, `critical`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}
