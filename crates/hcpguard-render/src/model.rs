use hcpguard_types::{EvaluationResult, FailureKind, OverallStatus};

/// How a result row is labelled. Rules that could not be evaluated are `Error`, not `Fail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowStatus {
    Pass,
    Fail,
    Error,
}

impl RowStatus {
    pub fn of(result: &EvaluationResult) -> Self {
        if result.is_error() {
            RowStatus::Error
        } else if result.passed {
            RowStatus::Pass
        } else {
            RowStatus::Fail
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RowStatus::Pass => "PASS",
            RowStatus::Fail => "FAIL",
            RowStatus::Error => "ERROR",
        }
    }
}

pub(crate) fn status_label(status: OverallStatus) -> &'static str {
    match status {
        OverallStatus::Pass => "PASS",
        OverallStatus::Fail => "FAIL",
    }
}

pub(crate) fn kind_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::UnsupportedFormat => "unsupported format",
        FailureKind::Parse => "parse error",
        FailureKind::Io => "io error",
    }
}

/// Text explaining a non-passing row: the evaluation error, or the rule message plus any note.
pub(crate) fn failure_text(result: &EvaluationResult) -> String {
    match (&result.evaluation_error, &result.note) {
        (Some(err), _) => format!("{}: {}", err.code, err.message),
        (None, Some(note)) => format!("{} ({note})", result.message),
        (None, None) => result.message.clone(),
    }
}
