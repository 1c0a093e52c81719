use hcpguard_types::ScanReport;

/// Pretty-printed JSON with a trailing newline.
pub fn render_json(report: &ScanReport) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}
