//! Closed vocabularies used by rule records.
//!
//! Every enum parses from (and renders to) the lowercase token used in rule files and reports.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A token that does not name any variant of a closed vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str, tokens: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: tokens.join(", "),
        }
    }
}

/// Rule severity, totally ordered `info < warning < critical`.
///
/// The default is `critical`, which is also the default fail-level threshold.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    #[default]
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(UnknownVariant::new(
                "severity",
                other,
                &["info", "warning", "critical"],
            )),
        }
    }
}

/// Product a configuration (or a rule) applies to.
///
/// `All` is only meaningful on rules: it scopes a rule to every product.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Vault,
    Consul,
    Nomad,
    All,
}

impl Product {
    /// Concrete products, excluding `All`.
    pub const CONCRETE: [Product; 3] = [Product::Vault, Product::Consul, Product::Nomad];

    pub fn as_str(self) -> &'static str {
        match self {
            Product::Vault => "vault",
            Product::Consul => "consul",
            Product::Nomad => "nomad",
            Product::All => "all",
        }
    }
}

impl FromStr for Product {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vault" => Ok(Product::Vault),
            "consul" => Ok(Product::Consul),
            "nomad" => Ok(Product::Nomad),
            "all" => Ok(Product::All),
            other => Err(UnknownVariant::new(
                "product",
                other,
                &["vault", "consul", "nomad", "all"],
            )),
        }
    }
}

/// Comparison operator of a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Exists,
    Absent,
    Equals,
    NotEquals,
    In,
    Regex,
    Gt,
    Lt,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Exists,
        Operator::Absent,
        Operator::Equals,
        Operator::NotEquals,
        Operator::In,
        Operator::Regex,
        Operator::Gt,
        Operator::Lt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Exists => "exists",
            Operator::Absent => "absent",
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::In => "in",
            Operator::Regex => "regex",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
        }
    }

    /// Whether rules using this operator must carry an `expected` value.
    pub fn requires_expected(self) -> bool {
        !matches!(self, Operator::Exists | Operator::Absent)
    }
}

impl FromStr for Operator {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| {
                let tokens: Vec<&str> = Operator::ALL.iter().map(|op| op.as_str()).collect();
                UnknownVariant::new("operator", s, &tokens)
            })
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Severity, Product, Operator);
