//! Stable DTOs and IDs used across the hcpguard workspace.
//!
//! This crate is intentionally boring:
//! - the canonical configuration value model
//! - closed rule vocabularies (severity, product, operator)
//! - data types for the emitted report
//! - canonical target path handling

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod report;
pub mod rule;
pub mod value;

pub use path::TargetPath;
pub use report::{
    EvaluationError, EvaluationResult, FailureKind, FileFailure, FileReport, OverallStatus,
    ResultCounts, SCHEMA_REPORT_V1, ScanReport, ScanSummary, SeverityCounts, SourceLocation,
    ToolMeta, ValidationReport,
};
pub use rule::{Operator, Product, Severity, UnknownVariant};
pub use value::{Map, Number, Value};
