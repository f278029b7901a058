//! Main report workflow
//!
//! Keeps the pipeline independent of clap and of the process environment:
//! every collaborator is passed in, so the whole run can be driven from tests.

use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::domain::VersionReport;
use crate::error::Result;
use crate::git::TagSource;
use crate::normalize::normalize;
use crate::publish::{ActionsEnv, CommentAction, CommentApi, Publisher};
use crate::render::render;
use crate::resolver::PreviousVersionResolver;
use crate::source::VersionSource;
use crate::warning::RunWarning;

/// Result of a successful report run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub report: VersionReport,

    /// The report in the configured output format
    pub rendered: String,

    /// Where the report was written, if an output file was configured
    pub output_file: Option<PathBuf>,

    pub comment: Option<CommentAction>,

    pub total_projects: usize,

    pub changed_projects: usize,

    /// Non-fatal problems, in the order they occurred
    pub warnings: Vec<RunWarning>,
}

/// Runs the whole pipeline once:
/// 1. Fetch the raw report from the version source
/// 2. Normalize it into the canonical model
/// 3. Fill in previous versions from tags
/// 4. Render in the configured format
/// 5. Publish to the configured destinations
///
/// # Returns
/// * `Ok(RunOutcome)` - The report was produced and delivered
/// * `Err` - The tool failed, its output could not be parsed, or the
///   output file could not be written
pub fn run_report_workflow<S, T, C>(
    config: &Config,
    env: &ActionsEnv,
    source: &S,
    tags: &T,
    comments: Option<&C>,
) -> Result<RunOutcome>
where
    S: VersionSource,
    T: TagSource,
    C: CommentApi,
{
    info!(repo = %config.repo_path.display(), tool = %config.tool_command, "generating version report");
    let raw = source.fetch_report(config)?;

    let mut report = normalize(&raw, config)?;
    info!(
        projects = report.summary.total_projects,
        changed = report.summary.projects_with_changes,
        "report normalized"
    );

    let resolver = PreviousVersionResolver::new(tags, config.tag_prefix.clone());
    let mut warnings = resolver.enhance(&mut report);

    let rendered = render(&report, config.output_format, config.changed_only);

    let published = Publisher::new(config, env, comments).publish(&report, &rendered)?;
    warnings.extend(published.warnings);

    Ok(RunOutcome {
        total_projects: report.summary.total_projects,
        changed_projects: report.summary.projects_with_changes,
        report,
        rendered,
        output_file: published.output_file,
        comment: published.comment,
        warnings,
    })
}
