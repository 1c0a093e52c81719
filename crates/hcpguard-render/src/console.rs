use crate::model::{RowStatus, failure_text, kind_label, status_label};
use hcpguard_types::{FileFailure, FileReport, ScanReport, ValidationReport};
use std::fmt::Write;

const DETAIL_INDENT: &str = "          ";

/// Plain-text summary followed by one block per file.
pub fn render_console(report: &ScanReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    let _ = writeln!(
        out,
        "hcpguard: {} (fail level: {})",
        status_label(report.status),
        report.fail_level
    );
    let _ = writeln!(
        out,
        "files: {} total, {} validated, {} failed",
        s.files_total, s.files_validated, s.files_failed
    );
    let _ = writeln!(
        out,
        "rules: {} evaluated, {} failed",
        s.rules_evaluated, s.rules_failed
    );

    if report.files.is_empty() {
        out.push_str("\nNo config files found.\n");
        return out;
    }

    for file in &report.files {
        out.push('\n');
        match file {
            FileReport::Validated(r) => render_validated(&mut out, r),
            FileReport::Failed(f) => render_failed(&mut out, f),
        }
    }

    out
}

fn render_validated(out: &mut String, r: &ValidationReport) {
    let c = &r.counts;
    let _ = writeln!(
        out,
        "{} [{}] {}",
        r.target,
        r.product,
        status_label(r.overall_status)
    );
    let _ = writeln!(
        out,
        "  passed {}, failed {} (critical {}, warning {}, info {}), errors {}",
        c.passed,
        c.failed,
        c.failed_by_severity.critical,
        c.failed_by_severity.warning,
        c.failed_by_severity.info,
        c.errored
    );

    if r.results.is_empty() {
        out.push_str("  no applicable rules\n");
        return;
    }

    let id_width = r
        .results
        .iter()
        .map(|res| res.rule_id.len())
        .chain(std::iter::once("RULE".len()))
        .max()
        .unwrap_or(4);

    let _ = writeln!(out, "  STATUS  SEVERITY  {:<id_width$}  TITLE", "RULE");
    for res in &r.results {
        let status = RowStatus::of(res);
        let _ = writeln!(
            out,
            "  {:<6}  {:<8}  {:<id_width$}  {}",
            status.label(),
            res.severity.as_str(),
            res.rule_id,
            res.title
        );
        if status != RowStatus::Pass {
            let _ = writeln!(out, "{DETAIL_INDENT}{}", failure_text(res));
            if status == RowStatus::Fail {
                let _ = writeln!(out, "{DETAIL_INDENT}remediation: {}", res.remediation);
            }
        }
    }
}

fn render_failed(out: &mut String, f: &FileFailure) {
    let _ = writeln!(out, "{} NOT VALIDATED ({})", f.target, kind_label(f.kind));
    let _ = writeln!(out, "  {}", f.message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_report;
    use hcpguard_types::{Severity, ToolMeta};
    use time::OffsetDateTime;

    #[test]
    fn renders_every_file_kind() {
        insta::assert_snapshot!(render_console(&sample_report()), @r"
        hcpguard: FAIL (fail level: critical)
        files: 3 total, 2 validated, 1 failed
        rules: 4 evaluated, 3 failed

        broken/bad.json NOT VALIDATED (parse error)
          invalid json at line 4, column 3: trailing comma

        nomad/client.hcl [nomad] PASS
          passed 0, failed 0 (critical 0, warning 0, info 0), errors 0
          no applicable rules

        vault/insecure.hcl [vault] FAIL
          passed 1, failed 3 (critical 1, warning 2, info 0), errors 1
          STATUS  SEVERITY  RULE     TITLE
          FAIL    critical  VLT-001  Storage backend is not file
                  Storage backend is not file check failed.
                  remediation: Fix VLT-001.
          ERROR   warning   VLT-009  TTL | pattern
                  invalid_pattern: invalid regex '('
          FAIL    warning   VLT-004  Memory lock enabled
                  Memory lock enabled check failed. (type_mismatch: cannot order a list value)
                  remediation: Fix VLT-004.
          PASS    info      VLT-006  Web UI disabled
        ");
    }

    #[test]
    fn empty_scan_says_so() {
        let report = ScanReport::from_files(
            ToolMeta {
                name: "hcpguard".to_string(),
                version: "0.1.0".to_string(),
            },
            OffsetDateTime::UNIX_EPOCH,
            OffsetDateTime::UNIX_EPOCH,
            None,
            Severity::Warning,
            Vec::new(),
        );
        let text = render_console(&report);
        assert!(text.starts_with("hcpguard: PASS (fail level: warning)\n"));
        assert!(text.ends_with("No config files found.\n"));
    }
}
