//! Pure rule evaluation (no IO).
//!
//! Input: canonical documents and raw rule records constructed elsewhere.
//! Output: per-rule results and an aggregated report against a fail-level threshold.

#![forbid(unsafe_code)]

pub mod document;
pub mod operators;
pub mod path;
pub mod policy;
pub mod registry;
pub mod report;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use document::{CanonicalDocument, Format};
pub use engine::{evaluate, validate};
pub use fingerprint::fingerprint_for_result;
pub use path::{PathExpr, PathSyntaxError, Resolution};
pub use policy::{EffectiveConfig, RulePolicy};
pub use registry::{RawRule, RuleDefinition, RuleDefinitionError, RuleRegistry, RuleViolation};
