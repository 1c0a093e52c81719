use crate::model::{RowStatus, failure_text, kind_label, status_label};
use hcpguard_types::{FileFailure, FileReport, ScanReport, ValidationReport};
use std::fmt::Write;

pub fn render_markdown(report: &ScanReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    out.push_str("# hcpguard report\n\n");
    let _ = write!(
        out,
        "- Status: **{}**\n- Fail level: `{}`\n- Files: {} ({} validated, {} failed)\n- Rules: {} evaluated, {} failed\n",
        status_label(report.status),
        report.fail_level,
        s.files_total,
        s.files_validated,
        s.files_failed,
        s.rules_evaluated,
        s.rules_failed
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
    let _ = writeln!(
        out,
        "## `{}` ({}): {}\n",
        r.target,
        r.product,
        status_label(r.overall_status)
    );

    if r.results.is_empty() {
        out.push_str("No applicable rules.\n");
        return;
    }

    out.push_str("| Rule | Title | Severity | Status | Message | Remediation | Reference |\n");
    out.push_str("|---|---|---|---|---|---|---|\n");
    for res in &r.results {
        let status = RowStatus::of(res);
        let message = match status {
            RowStatus::Pass => res.message.clone(),
            _ => failure_text(res),
        };
        let reference = res
            .reference
            .as_deref()
            .map(|url| format!("[link]({url})"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            cell(&res.rule_id),
            cell(&res.title),
            res.severity,
            status.label(),
            cell(&message),
            cell(&res.remediation),
            reference
        );
    }
}

fn render_failed(out: &mut String, f: &FileFailure) {
    let _ = writeln!(out, "## `{}`: NOT VALIDATED\n", f.target);
    let _ = writeln!(out, "> {}: {}", kind_label(f.kind), f.message);
}

/// Keep a value inside one table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
