use crate::model::HcpguardConfigV1;
use anyhow::Context;
use globset::Glob;
use hcpguard_domain::{EffectiveConfig, RulePolicy};
use hcpguard_types::Severity;

/// Command-line values; each one set here wins over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub fail_level: Option<Severity>,
    pub inject_defaults: Option<bool>,
    pub builtin_rules: Option<bool>,
    /// Appended after the config file's `rule_files`.
    pub rule_files: Vec<String>,
    /// Appended after the config file's `exclude`.
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub inject_defaults: bool,
    pub builtin_rules: bool,
    /// Rule files named by the config file, as written there.
    pub config_rule_files: Vec<String>,
    /// Rule files named on the command line.
    pub extra_rule_files: Vec<String>,
    pub exclude: Vec<String>,
}

pub fn resolve_config(
    cfg: HcpguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let fail_level = match overrides.fail_level {
        Some(level) => level,
        None => match cfg.fail_level.as_deref() {
            Some(s) => parse_severity(s).context("invalid fail_level")?,
            None => Severity::Critical,
        },
    };

    let mut effective = EffectiveConfig::with_fail_level(fail_level);

    // per-rule overrides
    for (rule_id, rc) in cfg.rules.iter() {
        let mut policy = RulePolicy::default();
        if let Some(enabled) = rc.enabled {
            policy.enabled = enabled;
        }
        if let Some(sev) = rc.severity.as_deref() {
            policy.severity =
                Some(parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?);
        }
        effective.rules.insert(rule_id.clone(), policy);
    }

    let mut exclude = cfg.exclude;
    exclude.extend(overrides.exclude);
    validate_globs(&exclude)?;

    Ok(ResolvedConfig {
        effective,
        inject_defaults: overrides
            .inject_defaults
            .or(cfg.inject_defaults)
            .unwrap_or(false),
        builtin_rules: overrides.builtin_rules.or(cfg.builtin_rules).unwrap_or(true),
        config_rule_files: cfg.rule_files,
        extra_rule_files: overrides.rule_files,
        exclude,
    })
}

fn validate_globs(patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid exclude glob: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    Ok(v.parse::<Severity>()?)
}
