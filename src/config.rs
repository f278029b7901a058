use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::render::ReportFormat;

/// File name looked up in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "version-report.toml";

/// Represents the complete configuration for a version-report run.
///
/// Built once (file defaults, then CLI overrides) and passed by reference
/// through every stage of the pipeline.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Repository root handed to the version tool and used for tag lookups
    pub repo_path: PathBuf,

    /// Restrict the version tool to a sub-directory of the repository
    pub project_dir: Option<String>,

    pub output_format: ReportFormat,

    /// Write the rendered report here, relative to `repo_path`
    pub output_file: Option<PathBuf>,

    /// Branch override passed to the version tool
    pub branch: Option<String>,

    pub tag_prefix: String,

    pub include_commits: bool,

    pub include_dependencies: bool,

    /// Only list changed projects in the projects section
    pub changed_only: bool,

    pub post_to_pr: bool,

    pub update_existing_comment: bool,

    /// Marker placed at the top of the PR comment, also used to find it again
    pub comment_header: String,

    /// Executable of the external version tool
    pub tool_command: String,

    /// Never read from or written to a file
    #[serde(skip)]
    pub github_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repo_path: PathBuf::from("."),
            project_dir: None,
            output_format: ReportFormat::Markdown,
            output_file: None,
            branch: None,
            tag_prefix: "v".to_string(),
            include_commits: true,
            include_dependencies: true,
            changed_only: false,
            post_to_pr: false,
            update_existing_comment: true,
            comment_header: "## 📦 Version Report".to_string(),
            tool_command: "mr-version".to_string(),
            github_token: None,
        }
    }
}

impl Config {
    /// Resolves the configured output file against the repository root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolved_output_file(&self) -> Option<PathBuf> {
        self.output_file
            .as_ref()
            .map(|file| self.repo_path.join(file))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `version-report.toml` in current directory
/// 3. `version-report.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            candidate
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReportError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    parse_config(&config_str)
        .map_err(|e| ReportError::config(format!("Invalid '{}': {}", path.display(), e)))
}

/// Parses a TOML document into a [`Config`], filling unset keys with defaults.
pub fn parse_config(contents: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(contents)
}
