use regex::Regex;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::publish::github::DEFAULT_API_URL;

const PULL_REQUEST_EVENTS: &[&str] = &["pull_request", "pull_request_target"];

/// The CI environment, captured once and passed around explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionsEnv {
    pub event_name: Option<String>,
    pub event_path: Option<PathBuf>,
    pub git_ref: Option<String>,
    /// `owner/repo`
    pub repository: Option<String>,
    pub api_url: String,
    pub output_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
}

impl Default for ActionsEnv {
    fn default() -> Self {
        ActionsEnv {
            event_name: None,
            event_path: None,
            git_ref: None,
            repository: None,
            api_url: DEFAULT_API_URL.to_string(),
            output_path: None,
            summary_path: None,
        }
    }
}

impl ActionsEnv {
    /// Read the `GITHUB_*` variables of the current process.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        ActionsEnv {
            event_name: var("GITHUB_EVENT_NAME"),
            event_path: var("GITHUB_EVENT_PATH").map(PathBuf::from),
            git_ref: var("GITHUB_REF"),
            repository: var("GITHUB_REPOSITORY"),
            api_url: var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            output_path: var("GITHUB_OUTPUT").map(PathBuf::from),
            summary_path: var("GITHUB_STEP_SUMMARY").map(PathBuf::from),
        }
    }

    pub fn is_pull_request(&self) -> bool {
        self.event_name
            .as_deref()
            .is_some_and(|name| PULL_REQUEST_EVENTS.contains(&name))
    }

    /// PR number from the event payload, falling back to `refs/pull/<n>/...`.
    pub fn pull_request_number(&self) -> Option<u64> {
        self.event_path
            .as_deref()
            .and_then(number_from_event_file)
            .or_else(|| self.git_ref.as_deref().and_then(number_from_ref))
    }
}

fn number_from_event_file(path: &Path) -> Option<u64> {
    let contents = std::fs::read_to_string(path).ok()?;
    let payload: Value = serde_json::from_str(&contents).ok()?;
    number_from_payload(&payload)
}

pub fn number_from_payload(payload: &Value) -> Option<u64> {
    payload
        .get("pull_request")
        .and_then(|pr| pr.get("number"))
        .and_then(Value::as_u64)
        .or_else(|| payload.get("number").and_then(Value::as_u64))
}

pub fn number_from_ref(git_ref: &str) -> Option<u64> {
    let re = Regex::new(r"^refs/pull/(\d+)/").ok()?;
    re.captures(git_ref)?.get(1)?.as_str().parse().ok()
}

fn append(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(contents.as_bytes())
}

/// Appends Markdown to the job summary file.
pub fn append_summary(path: &Path, markdown: &str) -> std::io::Result<()> {
    append(path, &format!("{}\n", markdown))
}

/// Appends `name=value` step outputs; values spanning lines use a heredoc
/// delimiter that does not occur in the value.
pub fn append_outputs(path: &Path, outputs: &[(&str, String)]) -> std::io::Result<()> {
    let mut buf = String::new();
    for (name, value) in outputs {
        if value.contains('\n') {
            let mut delimiter = "VERSION_REPORT_EOF".to_string();
            while value.contains(&delimiter) {
                delimiter.push('_');
            }
            buf.push_str(&format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter));
        } else {
            buf.push_str(&format!("{}={}\n", name, value));
        }
    }
    append(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)]) -> ActionsEnv {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ActionsEnv::from_vars(|name| map.get(name).cloned())
    }

    #[test]
    fn test_from_vars() {
        let env = env_of(&[
            ("GITHUB_EVENT_NAME", "pull_request"),
            ("GITHUB_REPOSITORY", "acme/platform"),
            ("GITHUB_STEP_SUMMARY", "/tmp/summary.md"),
            ("GITHUB_OUTPUT", ""),
        ]);

        assert!(env.is_pull_request());
        assert_eq!(env.repository.as_deref(), Some("acme/platform"));
        assert_eq!(env.api_url, DEFAULT_API_URL);
        assert_eq!(env.summary_path, Some(PathBuf::from("/tmp/summary.md")));
        assert_eq!(env.output_path, None);
    }

    #[test]
    fn test_pull_request_events() {
        assert!(env_of(&[("GITHUB_EVENT_NAME", "pull_request_target")]).is_pull_request());
        assert!(!env_of(&[("GITHUB_EVENT_NAME", "push")]).is_pull_request());
        assert!(!ActionsEnv::default().is_pull_request());
    }

    #[test]
    fn test_number_from_payload() {
        let payload: Value =
            serde_json::from_str(r#"{"action": "opened", "number": 3, "pull_request": {"number": 17}}"#)
                .unwrap();
        assert_eq!(number_from_payload(&payload), Some(17));

        let payload: Value = serde_json::from_str(r#"{"number": 3}"#).unwrap();
        assert_eq!(number_from_payload(&payload), Some(3));

        let payload: Value = serde_json::from_str(r#"{"ref": "refs/heads/main"}"#).unwrap();
        assert_eq!(number_from_payload(&payload), None);
    }

    #[test]
    fn test_number_from_ref() {
        assert_eq!(number_from_ref("refs/pull/128/merge"), Some(128));
        assert_eq!(number_from_ref("refs/heads/main"), None);
        assert_eq!(number_from_ref("refs/pull/abc/merge"), None);
    }

    #[test]
    fn test_number_from_event_file_then_ref() {
        let dir = tempfile::tempdir().unwrap();
        let event = dir.path().join("event.json");
        std::fs::write(&event, r#"{"pull_request": {"number": 42}}"#).unwrap();

        let env = ActionsEnv {
            event_path: Some(event),
            git_ref: Some("refs/pull/7/merge".to_string()),
            ..ActionsEnv::default()
        };
        assert_eq!(env.pull_request_number(), Some(42));

        let env = ActionsEnv {
            event_path: Some(dir.path().join("missing.json")),
            git_ref: Some("refs/pull/7/merge".to_string()),
            ..ActionsEnv::default()
        };
        assert_eq!(env.pull_request_number(), Some(7));
    }

    #[test]
    fn test_append_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        append_outputs(
            &path,
            &[
                ("report", "line one\nline two".to_string()),
                ("total-projects", "3".to_string()),
            ],
        )
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "existing=1\nreport<<VERSION_REPORT_EOF\nline one\nline two\nVERSION_REPORT_EOF\ntotal-projects=3\n"
        );
    }

    #[test]
    fn test_output_delimiter_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");

        append_outputs(&path, &[("report", "a\nVERSION_REPORT_EOF\nb".to_string())]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("report<<VERSION_REPORT_EOF_\n"));
        assert!(written.ends_with("\nVERSION_REPORT_EOF_\n"));
    }
}
