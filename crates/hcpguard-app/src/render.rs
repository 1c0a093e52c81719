//! Render use case: turn a scan report into the requested output format.

use anyhow::Context;
use hcpguard_types::ScanReport;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Console => "console",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            other => anyhow::bail!("unknown output format: {other} (expected console|json|md)"),
        }
    }
}

pub fn render_report(report: &ScanReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Console => Ok(hcpguard_render::render_console(report)),
        OutputFormat::Json => hcpguard_render::render_json(report).context("serialize report"),
        OutputFormat::Markdown => Ok(hcpguard_render::render_markdown(report)),
    }
}
