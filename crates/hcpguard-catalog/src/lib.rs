//! Rule sources for hcpguard.
//!
//! - the shipped rule sets, embedded at compile time
//! - YAML rule files supplied by the user
//!
//! Both produce raw records; validation happens in `hcpguard_domain::RuleRegistry::build`.

#![forbid(unsafe_code)]

mod builtin;
mod source;

pub use builtin::{BUILTIN_SOURCES, BuiltinSource, builtin_records};
pub use source::{RuleSourceError, load_rule_file, parse_rule_source};
