use std::fmt;

/// Non-fatal problems encountered during a run.
/// These are reported to the user but never change the run's outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum RunWarning {
    /// Listing tags for a project failed; its previous version stays unknown
    PreviousVersionLookup { project: String, reason: String },
    /// PR comment requested outside of a pull-request event
    NotPullRequest { event: String },
    /// Pull-request event without a resolvable PR number
    NoPullRequestNumber,
    /// Listing, creating or updating the PR comment failed
    CommentFailed { reason: String },
    /// Appending to the job summary failed
    SummaryWrite { reason: String },
    /// Writing step outputs failed
    OutputWrite { reason: String },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::PreviousVersionLookup { project, reason } => {
                write!(
                    f,
                    "Could not determine previous version for '{}': {}",
                    project, reason
                )
            }
            RunWarning::NotPullRequest { event } => {
                let event = if event.is_empty() { "unknown" } else { event };
                write!(
                    f,
                    "Not a pull request event ('{}'), skipping PR comment",
                    event
                )
            }
            RunWarning::NoPullRequestNumber => {
                write!(
                    f,
                    "Could not determine pull request number, skipping PR comment"
                )
            }
            RunWarning::CommentFailed { reason } => {
                write!(f, "Failed to post PR comment: {}", reason)
            }
            RunWarning::SummaryWrite { reason } => {
                write!(f, "Failed to write job summary: {}", reason)
            }
            RunWarning::OutputWrite { reason } => {
                write!(f, "Failed to write step outputs: {}", reason)
            }
        }
    }
}
