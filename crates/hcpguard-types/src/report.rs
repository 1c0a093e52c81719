use crate::{Operator, Product, Severity, TargetPath, Value};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for the multi-file report envelope.
pub const SCHEMA_REPORT_V1: &str = "hcpguard.report.v1";

/// Why a rule could not be evaluated (distinct from an ordinary fail).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationError {
    pub code: String,
    pub message: String,
}

/// Outcome of one rule against one document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationResult {
    pub rule_id: String,
    pub title: String,
    pub severity: Severity,
    pub operator: Operator,
    pub path: String,
    pub passed: bool,

    /// Snapshot of the resolved value; projections are recorded as a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    /// Explanation attached to a fail caused by uncomparable operands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_error: Option<EvaluationError>,

    pub message: String,
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `rule_id + product + target`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl EvaluationResult {
    pub fn is_error(&self) -> bool {
        self.evaluation_error.is_some()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub info: u32,
    pub warning: u32,
    pub critical: u32,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
        }
    }

    /// Highest severity with a non-zero count.
    pub fn highest(&self) -> Option<Severity> {
        Severity::ALL
            .into_iter()
            .rev()
            .find(|sev| self.get(*sev) > 0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultCounts {
    pub total: u32,
    pub passed: u32,
    /// Failed results, including evaluation errors.
    pub failed: u32,
    pub errored: u32,
    pub passed_by_severity: SeverityCounts,
    pub failed_by_severity: SeverityCounts,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Pass,
    Fail,
}

/// Per-file report handed to reporters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub target: TargetPath,
    pub product: Product,
    pub fail_level: Severity,
    pub overall_status: OverallStatus,
    pub counts: ResultCounts,
    pub results: Vec<EvaluationResult>,
}

/// Where in a source file a parse problem was found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column, self.offset) {
            (Some(line), Some(col), _) => write!(f, "line {line}, column {col}"),
            (Some(line), None, _) => write!(f, "line {line}"),
            (None, _, Some(offset)) => write!(f, "byte {offset}"),
            _ => f.write_str("unknown location"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnsupportedFormat,
    Parse,
    Io,
}

/// A file that could not be turned into a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileFailure {
    pub target: TargetPath,
    pub kind: FailureKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileReport {
    Validated(ValidationReport),
    Failed(FileFailure),
}

impl FileReport {
    pub fn target(&self) -> &TargetPath {
        match self {
            FileReport::Validated(r) => &r.target,
            FileReport::Failed(f) => &f.target,
        }
    }

    pub fn status(&self) -> OverallStatus {
        match self {
            FileReport::Validated(r) => r.overall_status,
            FileReport::Failed(_) => OverallStatus::Fail,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanSummary {
    pub files_total: u32,
    pub files_validated: u32,
    pub files_failed: u32,
    pub rules_evaluated: u32,
    pub rules_failed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Envelope for one invocation over one or more target files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    /// Product requested by the caller; `None` when detected per file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    pub fail_level: Severity,
    pub status: OverallStatus,
    pub summary: ScanSummary,
    /// Sorted by target path.
    pub files: Vec<FileReport>,
}

impl ScanReport {
    /// Fold file reports into the envelope; files are re-sorted by target.
    pub fn from_files(
        tool: ToolMeta,
        started_at: OffsetDateTime,
        finished_at: OffsetDateTime,
        product: Option<Product>,
        fail_level: Severity,
        mut files: Vec<FileReport>,
    ) -> Self {
        files.sort_by(|a, b| a.target().cmp(b.target()));

        let mut summary = ScanSummary {
            files_total: files.len() as u32,
            ..ScanSummary::default()
        };
        for file in &files {
            match file {
                FileReport::Validated(r) => {
                    summary.files_validated += 1;
                    summary.rules_evaluated += r.counts.total;
                    summary.rules_failed += r.counts.failed;
                }
                FileReport::Failed(_) => summary.files_failed += 1,
            }
        }

        let status = if files.iter().any(|f| f.status() == OverallStatus::Fail) {
            OverallStatus::Fail
        } else {
            OverallStatus::Pass
        };

        Self {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool,
            started_at,
            finished_at,
            product,
            fail_level,
            status,
            summary,
            files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validated(target: &str, status: OverallStatus, failed: u32) -> FileReport {
        FileReport::Validated(ValidationReport {
            target: TargetPath::new(target),
            product: Product::Vault,
            fail_level: Severity::Critical,
            overall_status: status,
            counts: ResultCounts {
                total: 3,
                passed: 3 - failed,
                failed,
                ..ResultCounts::default()
            },
            results: Vec::new(),
        })
    }

    fn tool() -> ToolMeta {
        ToolMeta {
            name: "hcpguard".to_string(),
            version: "0.0.0".to_string(),
        }
    }

    #[test]
    fn scan_report_sorts_files_and_summarizes() {
        let now = OffsetDateTime::UNIX_EPOCH;
        let files = vec![
            validated("b.hcl", OverallStatus::Pass, 1),
            FileReport::Failed(FileFailure {
                target: TargetPath::new("c.json"),
                kind: FailureKind::Parse,
                message: "expected value".to_string(),
                location: None,
            }),
            validated("a.hcl", OverallStatus::Pass, 0),
        ];

        let report = ScanReport::from_files(tool(), now, now, None, Severity::Critical, files);
        let targets: Vec<&str> = report.files.iter().map(|f| f.target().as_str()).collect();
        assert_eq!(targets, vec!["a.hcl", "b.hcl", "c.json"]);
        assert_eq!(report.summary.files_validated, 2);
        assert_eq!(report.summary.files_failed, 1);
        assert_eq!(report.summary.rules_evaluated, 6);
        assert_eq!(report.summary.rules_failed, 1);
        // A file that failed to load fails the scan.
        assert_eq!(report.status, OverallStatus::Fail);
    }

    #[test]
    fn scan_report_passes_when_every_file_passes() {
        let now = OffsetDateTime::UNIX_EPOCH;
        let files = vec![validated("a.hcl", OverallStatus::Pass, 2)];
        let report =
            ScanReport::from_files(tool(), now, now, Some(Product::Vault), Severity::Critical, files);
        assert_eq!(report.status, OverallStatus::Pass);
    }

    #[test]
    fn file_report_serializes_with_outcome_tag() {
        let failure = FileReport::Failed(FileFailure {
            target: TargetPath::new("x.txt"),
            kind: FailureKind::UnsupportedFormat,
            message: "no format".to_string(),
            location: None,
        });
        let json = serde_json::to_value(&failure).expect("serialize");
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["kind"], "unsupported_format");
        assert_eq!(json["target"], "x.txt");
    }

    #[test]
    fn highest_severity_ignores_zero_counts() {
        let mut counts = SeverityCounts::default();
        assert_eq!(counts.highest(), None);
        counts.record(Severity::Info);
        counts.record(Severity::Warning);
        assert_eq!(counts.highest(), Some(Severity::Warning));
    }
}
