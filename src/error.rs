use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for version-report operations.
///
/// Every variant is fatal to the run. Non-fatal problems are reported as
/// [`crate::warning::RunWarning`] instead.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Version tool failed: {0}")]
    Tool(String),

    #[error("Failed to parse version tool output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("Tag lookup failed: {0}")]
    Tag(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience type alias for Results in version-report
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Create a version tool error with context
    pub fn tool(msg: impl Into<String>) -> Self {
        ReportError::Tool(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReportError::Config(msg.into())
    }

    /// Create a GitHub API error with context
    pub fn github(msg: impl Into<String>) -> Self {
        ReportError::GitHub(msg.into())
    }

    /// Create a tag lookup error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReportError::Tag(msg.into())
    }

    pub fn output_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::OutputFile {
            path: path.into(),
            source,
        }
    }
}
