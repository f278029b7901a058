use std::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::error::{ReportError, Result};

/// Produces the raw JSON report for a repository.
pub trait VersionSource {
    fn fetch_report(&self, config: &Config) -> Result<String>;
}

/// Runs the external version tool and captures its standard output.
pub struct ToolExecutor {
    command: String,
}

impl ToolExecutor {
    pub fn new(command: impl Into<String>) -> Self {
        ToolExecutor {
            command: command.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tool_command.clone())
    }
}

/// Builds the tool's argument list from the run configuration.
///
/// Test projects and non-packable projects are always requested; filtering is
/// a rendering concern.
pub fn tool_args(config: &Config) -> Vec<String> {
    let mut args = vec![
        "report".to_string(),
        "--repo".to_string(),
        config.repo_path.display().to_string(),
        "--output".to_string(),
        "json".to_string(),
    ];

    if let Some(dir) = &config.project_dir {
        args.push("--project-dir".to_string());
        args.push(dir.clone());
    }
    if let Some(branch) = &config.branch {
        args.push("--branch".to_string());
        args.push(branch.clone());
    }
    if !config.tag_prefix.is_empty() {
        args.push("--tag-prefix".to_string());
        args.push(config.tag_prefix.clone());
    }

    args.extend([
        "--include-commits".to_string(),
        config.include_commits.to_string(),
        "--include-dependencies".to_string(),
        config.include_dependencies.to_string(),
        "--include-test-projects".to_string(),
        "true".to_string(),
        "--include-non-packable".to_string(),
        "true".to_string(),
    ]);

    args
}

impl VersionSource for ToolExecutor {
    /// Runs the tool once.
    ///
    /// # Returns
    /// * `Ok(String)` - Standard output of a successful run
    /// * `Err` - If the tool cannot be started or exits with a non-zero code;
    ///   the error carries the tool's standard error
    fn fetch_report(&self, config: &Config) -> Result<String> {
        let args = tool_args(config);
        debug!(command = %self.command, ?args, "running version tool");

        let output = Command::new(&self.command)
            .args(&args)
            .output()
            .map_err(|e| {
                ReportError::tool(format!("Failed to execute '{}': {}", self.command, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReportError::tool(format!(
                "'{}' exited with code {}: {}",
                self.command,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
