//! Config parsing and policy resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{HcpguardConfigV1, RuleConfig};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `hcpguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<HcpguardConfigV1> {
    let cfg: HcpguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (config file + command-line overrides).
pub fn resolve_config(
    cfg: HcpguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
