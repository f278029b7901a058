use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::git::TagSource;

/// Lists tags by running the `git` binary inside the repository.
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        GitCli {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }
}

impl TagSource for GitCli {
    /// A non-zero git exit status means "no tags", not an error. Only failing
    /// to start git at all is reported.
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        debug!(pattern, repo = %self.repo_path.display(), "listing tags");

        let output = Command::new("git")
            .args(["tag", "-l", pattern, "--sort=-version:refname"])
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| ReportError::tag(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            debug!(
                pattern,
                code = output.status.code().unwrap_or(-1),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git tag exited unsuccessfully"
            );
            return Ok(Vec::new());
        }

        Ok(parse_tag_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Splits `git tag -l` output into tag names, preserving order.
pub fn parse_tag_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
