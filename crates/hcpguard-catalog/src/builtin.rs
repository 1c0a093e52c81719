use crate::source::{RuleSourceError, parse_rule_source};
use hcpguard_domain::RawRule;
use hcpguard_types::Product;

/// One embedded rule file.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinSource {
    pub name: &'static str,
    pub product: Product,
    pub text: &'static str,
}

/// Shipped rule files, common rules first.
pub const BUILTIN_SOURCES: [BuiltinSource; 4] = [
    BuiltinSource {
        name: "builtin:common.yaml",
        product: Product::All,
        text: include_str!("../rules/common.yaml"),
    },
    BuiltinSource {
        name: "builtin:vault.yaml",
        product: Product::Vault,
        text: include_str!("../rules/vault.yaml"),
    },
    BuiltinSource {
        name: "builtin:consul.yaml",
        product: Product::Consul,
        text: include_str!("../rules/consul.yaml"),
    },
    BuiltinSource {
        name: "builtin:nomad.yaml",
        product: Product::Nomad,
        text: include_str!("../rules/nomad.yaml"),
    },
];

/// Every shipped rule record, in declaration order.
pub fn builtin_records() -> Result<Vec<RawRule>, RuleSourceError> {
    let mut out = Vec::new();
    for source in BUILTIN_SOURCES {
        out.extend(parse_rule_source(source.name, source.text)?);
    }
    Ok(out)
}
