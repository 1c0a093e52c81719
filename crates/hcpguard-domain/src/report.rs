use hcpguard_types::{
    EvaluationResult, OverallStatus, Product, ResultCounts, Severity, TargetPath, ValidationReport,
};

pub fn count_results(results: &[EvaluationResult]) -> ResultCounts {
    let mut counts = ResultCounts {
        total: results.len() as u32,
        ..ResultCounts::default()
    };
    for r in results {
        if r.passed {
            counts.passed += 1;
            counts.passed_by_severity.record(r.severity);
        } else {
            counts.failed += 1;
            counts.failed_by_severity.record(r.severity);
        }
        if r.is_error() {
            counts.errored += 1;
        }
    }
    counts
}

/// Fail iff the highest failed severity reaches the threshold.
pub fn overall_status(counts: &ResultCounts, fail_level: Severity) -> OverallStatus {
    match counts.failed_by_severity.highest() {
        Some(highest) if highest >= fail_level => OverallStatus::Fail,
        _ => OverallStatus::Pass,
    }
}

pub fn aggregate(
    target: TargetPath,
    product: Product,
    fail_level: Severity,
    results: Vec<EvaluationResult>,
) -> ValidationReport {
    let counts = count_results(&results);
    let overall_status = overall_status(&counts, fail_level);
    ValidationReport {
        target,
        product,
        fail_level,
        overall_status,
        counts,
        results,
    }
}
