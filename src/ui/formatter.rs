//! Formatting for status lines.
//!
//! `format_*` functions build the text, `display_*` functions print it to stderr.

use console::style;

use crate::cli::RunOutcome;
use crate::warning::RunWarning;

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn format_warning(warning: &RunWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

/// One line describing what a run produced and where it went.
pub fn format_run_summary(outcome: &RunOutcome) -> String {
    let mut line = format!(
        "{} projects, {} changed",
        outcome.total_projects, outcome.changed_projects
    );
    if let Some(path) = &outcome.output_file {
        line.push_str(&format!(", written to {}", path.display()));
    }
    line
}

pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

pub fn display_success(message: &str) {
    eprintln!("{}", format_success(message));
}

pub fn display_status(message: &str) {
    eprintln!("{}", format_status(message));
}

pub fn display_warning(warning: &RunWarning) {
    eprintln!("{}", format_warning(warning));
}

/// Print every warning of the run, then the summary line.
pub fn display_run_summary(outcome: &RunOutcome) {
    for warning in &outcome.warnings {
        display_warning(warning);
    }
    display_success(&format_run_summary(outcome));
}
