//! The `validate` use case: load configs, evaluate rules, and produce a scan report.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use hcpguard_domain::{CanonicalDocument, EffectiveConfig, RawRule, RuleRegistry};
use hcpguard_settings::{Overrides, ResolvedConfig};
use hcpguard_types::{
    FileReport, OverallStatus, Product, ScanReport, TargetPath, ToolMeta, ids,
};
use rayon::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Input for the validate use case.
#[derive(Clone, Debug)]
pub struct ValidateInput<'a> {
    /// Files or directories to validate.
    pub paths: &'a [Utf8PathBuf],
    /// Product to validate as; `None` detects it per file.
    pub product: Option<Product>,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Directory that config-relative paths (`rule_files`) are resolved against.
    pub config_dir: &'a Utf8Path,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the validate use case.
#[derive(Clone, Debug)]
pub struct ValidateOutput {
    pub report: ScanReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
    /// Number of rules in the registry.
    pub rule_count: usize,
}

/// Run the validate use case: resolve config, build the rule registry, discover targets, then
/// evaluate each file.
pub fn run_validate(input: ValidateInput<'_>) -> anyhow::Result<ValidateOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        hcpguard_settings::HcpguardConfigV1::default()
    } else {
        hcpguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        hcpguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let records = gather_rules(&resolved, input.config_dir)?;
    let registry = RuleRegistry::build(records).context("build rule registry")?;
    if registry.is_empty() {
        anyhow::bail!("no rules to evaluate: shipped rules are disabled and no rule files were given");
    }
    for id in resolved.effective.rules.keys() {
        if registry.find(id).is_none() {
            warn!(rule_id = %id, "config refers to an unknown rule");
        }
    }

    let mut targets: Vec<TargetPath> = Vec::new();
    for path in input.paths {
        let found = hcpguard_loader::discover_configs(path, &resolved.exclude)
            .with_context(|| format!("discover configs under {path}"))?;
        targets.extend(found);
    }
    targets.sort();
    targets.dedup();
    info!(files = targets.len(), rules = registry.len(), "validating");

    let files: Vec<FileReport> = targets
        .par_iter()
        .map(|target| {
            validate_file(
                target,
                input.product,
                resolved.inject_defaults,
                &registry,
                &resolved.effective,
            )
        })
        .collect();

    let finished_at = OffsetDateTime::now_utc();
    let report = ScanReport::from_files(
        ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        input.product,
        resolved.effective.fail_level,
        files,
    );

    Ok(ValidateOutput {
        report,
        rule_count: registry.len(),
        resolved_config: resolved,
    })
}

/// Map scan status to exit code: 0 = pass, 2 = fail.
pub fn scan_exit_code(report: &ScanReport) -> i32 {
    match report.status {
        OverallStatus::Pass => 0,
        OverallStatus::Fail => 2,
    }
}

/// Shipped rules first, then config rule files, then command-line rule files.
fn gather_rules(resolved: &ResolvedConfig, config_dir: &Utf8Path) -> anyhow::Result<Vec<RawRule>> {
    let mut records = Vec::new();
    if resolved.builtin_rules {
        records.extend(hcpguard_catalog::builtin_records().context("load shipped rules")?);
    }

    let config_files = resolved
        .config_rule_files
        .iter()
        .map(|f| config_dir.join(f));
    let extra_files = resolved.extra_rule_files.iter().map(Utf8PathBuf::from);
    for path in config_files.chain(extra_files) {
        let loaded = hcpguard_catalog::load_rule_file(&path)
            .with_context(|| format!("load rule file {path}"))?;
        debug!(path = %path, rules = loaded.len(), "rule file loaded");
        records.extend(loaded);
    }

    Ok(records)
}

fn validate_file(
    target: &TargetPath,
    product: Option<Product>,
    inject_defaults: bool,
    registry: &RuleRegistry,
    cfg: &EffectiveConfig,
) -> FileReport {
    let doc = match hcpguard_loader::load_file(&target.to_utf8_pathbuf(), None) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(path = %target, error = %err, "config could not be loaded");
            return FileReport::Failed(err.into_failure(target.clone()));
        }
    };

    let product = match product.or_else(|| hcpguard_loader::detect_product(doc.root())) {
        Some(p) => p,
        None => {
            debug!(path = %target, "product not detected; evaluating common rules only");
            Product::All
        }
    };

    let doc = if inject_defaults {
        let source = doc.source().clone();
        let format = doc.format();
        let root = hcpguard_loader::apply_product_defaults(doc.into_root(), product);
        CanonicalDocument::new(root, source, format)
    } else {
        doc
    };

    let report = hcpguard_domain::validate(&doc, product, registry, cfg);
    debug!(
        path = %target,
        product = %product,
        status = ?report.overall_status,
        failed = report.counts.failed,
        "file validated"
    );
    FileReport::Validated(report)
}
