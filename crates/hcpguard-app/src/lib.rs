//! Use case orchestration for hcpguard.
//!
//! This crate provides the application layer: use cases that coordinate the loader, catalog,
//! domain, and render layers. It is intentionally thin and delegates heavy lifting to the
//! appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod explain;
mod render;
mod schema;
mod validate;

pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{OutputFormat, render_report};
pub use schema::{config_schema, report_schema};
pub use validate::{ValidateInput, ValidateOutput, run_validate, scan_exit_code};
