//! Report renderers
//!
//! Every renderer is a pure function of the report and the changed-only flag.
//! - `json` - the canonical report, pretty-printed
//! - `csv` - one quoted row per project
//! - `text` - plain text blocks for logs
//! - `markdown` - summary tables for PR comments and job summaries

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::VersionReport;

pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
    #[serde(alias = "txt")]
    #[value(alias = "txt")]
    Text,
    #[default]
    #[serde(alias = "md")]
    #[value(alias = "md")]
    Markdown,
}

impl ReportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Text => "text",
            ReportFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a report in the requested format.
///
/// `changed_only` restricts project listings to changed projects. It never
/// affects the JSON output or the Markdown "Changed Projects" section.
pub fn render(report: &VersionReport, format: ReportFormat, changed_only: bool) -> String {
    match format {
        ReportFormat::Json => json::render(report),
        ReportFormat::Csv => csv::render(report, changed_only),
        ReportFormat::Text => text::render(report, changed_only),
        ReportFormat::Markdown => markdown::render(report, changed_only),
    }
}
