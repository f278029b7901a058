//! Delivery of the rendered report
//!
//! Destinations are independent:
//! - `output_file` - written relative to the repository; failure is fatal
//! - PR comment - created or updated through [CommentApi]; failure is a warning
//! - job summary and step outputs - appended when running in GitHub Actions

pub mod actions;
pub mod github;
pub mod mock;

pub use actions::ActionsEnv;
pub use github::{CommentApi, CommentClient, GitHubClient, IssueComment};
pub use mock::{CommentCall, MockComments};

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::VersionReport;
use crate::error::{ReportError, Result};
use crate::render::ReportFormat;
use crate::warning::RunWarning;

/// What happened to the PR comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentAction {
    Created(u64),
    Updated(u64),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PublishOutcome {
    pub output_file: Option<PathBuf>,
    pub comment: Option<CommentAction>,
    pub warnings: Vec<RunWarning>,
}

pub struct Publisher<'a, C: CommentApi> {
    config: &'a Config,
    env: &'a ActionsEnv,
    comments: Option<&'a C>,
}

impl<'a, C: CommentApi> Publisher<'a, C> {
    /// `comments` is `None` when no token or repository is available.
    pub fn new(config: &'a Config, env: &'a ActionsEnv, comments: Option<&'a C>) -> Self {
        Publisher {
            config,
            env,
            comments,
        }
    }

    /// Deliver `rendered` to every configured destination.
    ///
    /// # Returns
    /// * `Ok(PublishOutcome)` - possibly carrying non-fatal warnings
    /// * `Err` - only when the output file cannot be written
    pub fn publish(&self, report: &VersionReport, rendered: &str) -> Result<PublishOutcome> {
        let mut outcome = PublishOutcome {
            output_file: self.write_output_file(rendered)?,
            ..PublishOutcome::default()
        };

        if self.config.post_to_pr {
            match self.post_comment(rendered) {
                Ok(action) => outcome.comment = Some(action),
                Err(warning) => outcome.warnings.push(warning),
            }
        }

        if let Some(warning) = self.write_summary(rendered) {
            outcome.warnings.push(warning);
        }
        if let Some(warning) = self.write_outputs(report, rendered, outcome.output_file.as_ref()) {
            outcome.warnings.push(warning);
        }

        for warning in &outcome.warnings {
            warn!(%warning, "publish warning");
        }
        Ok(outcome)
    }

    /// Directories are not created; any failure aborts the run.
    fn write_output_file(&self, rendered: &str) -> Result<Option<PathBuf>> {
        let Some(path) = self.config.resolved_output_file() else {
            return Ok(None);
        };

        std::fs::write(&path, rendered).map_err(|e| ReportError::output_file(path.clone(), e))?;
        info!(path = %path.display(), "report written");
        Ok(Some(path))
    }

    fn post_comment(&self, rendered: &str) -> std::result::Result<CommentAction, RunWarning> {
        if !self.env.is_pull_request() {
            return Err(RunWarning::NotPullRequest {
                event: self.env.event_name.clone().unwrap_or_default(),
            });
        }
        let number = self
            .env
            .pull_request_number()
            .ok_or(RunWarning::NoPullRequestNumber)?;
        let comments = self.comments.ok_or_else(|| RunWarning::CommentFailed {
            reason: "no GitHub token or repository available".to_string(),
        })?;

        let header = &self.config.comment_header;
        let body = format!("{}\n\n{}", header, rendered);

        upsert_comment(
            comments,
            number,
            header,
            &body,
            self.config.update_existing_comment,
        )
        .map_err(|e| RunWarning::CommentFailed {
            reason: e.to_string(),
        })
    }

    fn write_summary(&self, rendered: &str) -> Option<RunWarning> {
        let path = self.env.summary_path.as_ref()?;
        let markdown = summary_markdown(self.config.output_format, rendered);

        actions::append_summary(path, &markdown)
            .err()
            .map(|e| RunWarning::SummaryWrite {
                reason: e.to_string(),
            })
    }

    fn write_outputs(
        &self,
        report: &VersionReport,
        rendered: &str,
        output_file: Option<&PathBuf>,
    ) -> Option<RunWarning> {
        let path = self.env.output_path.as_ref()?;
        let outputs = [
            ("report", rendered.to_string()),
            (
                "output-file",
                output_file
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            ("total-projects", report.summary.total_projects.to_string()),
            (
                "changed-projects",
                report.summary.projects_with_changes.to_string(),
            ),
        ];

        actions::append_outputs(path, &outputs)
            .err()
            .map(|e| RunWarning::OutputWrite {
                reason: e.to_string(),
            })
    }
}

/// Update the first comment containing `header`, or create a new one.
pub fn upsert_comment<C: CommentApi>(
    api: &C,
    number: u64,
    header: &str,
    body: &str,
    update_existing: bool,
) -> Result<CommentAction> {
    if update_existing {
        let existing = api
            .list_comments(number)?
            .into_iter()
            .find(|c| c.body.as_deref().is_some_and(|b| b.contains(header)));

        if let Some(comment) = existing {
            debug!(id = comment.id, "updating existing comment");
            let updated = api.update_comment(comment.id, body)?;
            return Ok(CommentAction::Updated(updated.id));
        }
    }

    let created = api.create_comment(number, body)?;
    debug!(id = created.id, "created comment");
    Ok(CommentAction::Created(created.id))
}

/// JSON goes into a collapsible block; other formats are appended as is.
pub fn summary_markdown(format: ReportFormat, rendered: &str) -> String {
    match format {
        ReportFormat::Json => format!(
            "<details>\n<summary>Version Report (JSON)</summary>\n\n```json\n{}\n```\n\n</details>\n",
            rendered
        ),
        _ => rendered.to_string(),
    }
}
