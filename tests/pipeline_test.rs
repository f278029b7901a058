use std::path::{Path, PathBuf};

use version_report::cli::run_report_workflow;
use version_report::config::Config;
use version_report::git::MockTags;
use version_report::normalize::normalize;
use version_report::publish::{ActionsEnv, CommentAction, CommentCall, MockComments};
use version_report::render::ReportFormat;
use version_report::source::VersionSource;
use version_report::{ReportError, Result};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Serves a fixture file as the tool's output.
struct FixtureSource(PathBuf);

impl VersionSource for FixtureSource {
    fn fetch_report(&self, _config: &Config) -> Result<String> {
        Ok(std::fs::read_to_string(&self.0)?)
    }
}

fn pull_request_env(dir: &Path) -> ActionsEnv {
    let event = dir.join("event.json");
    std::fs::write(&event, r#"{"pull_request": {"number": 7}}"#).unwrap();
    ActionsEnv {
        event_name: Some("pull_request".to_string()),
        event_path: Some(event),
        repository: Some("acme/platform".to_string()),
        output_path: Some(dir.join("github_output")),
        summary_path: Some(dir.join("step_summary.md")),
        ..ActionsEnv::default()
    }
}

#[test]
fn test_nested_fixture_normalizes() {
    let raw = std::fs::read_to_string(fixture("nested_report.json")).unwrap();
    let report = normalize(&raw, &Config::default()).unwrap();

    assert_eq!(report.repository, "acme/platform");
    assert_eq!(report.branch_type, "Feature");
    assert_eq!(report.global_version.as_deref(), Some("3.0.0"));

    // Counts in the payload are ignored
    assert_eq!(report.summary.total_projects, 3);
    assert_eq!(report.summary.projects_with_changes, 2);
    assert_eq!(report.summary.test_projects, 1);
    assert_eq!(report.summary.packable_projects, 2);

    let billing = &report.projects[0];
    assert_eq!(billing.full_path, "/work/platform/src/Acme.Billing");
    assert_eq!(billing.version.commit_height, Some(3));
    let sem_ver = billing.version.sem_ver.as_ref().unwrap();
    assert_eq!((sem_ver.major, sem_ver.minor, sem_ver.patch), (2, 1, 0));
    assert_eq!(sem_ver.pre_release.as_deref(), Some("feature.3"));
    assert_eq!(billing.direct_dependency_names(), vec!["Acme.Core"]);
}

#[test]
fn test_flattened_fixture_normalizes() {
    let raw = std::fs::read_to_string(fixture("flattened_report.json")).unwrap();
    let config = Config {
        repo_path: PathBuf::from("/work/platform"),
        ..Config::default()
    };
    let report = normalize(&raw, &config).unwrap();

    let service_a = &report.projects[0];
    assert_eq!(service_a.name, "ServiceA");
    assert_eq!(service_a.full_path, "/work/platform/src/ServiceA");
    assert_eq!(service_a.version.version, "1.3.0");
    assert!(service_a.version.version_changed);
    assert_eq!(
        service_a.version.change_reason.as_deref(),
        Some("Dependency changed")
    );
    assert_eq!(report.global_version, None);
}

#[test]
fn test_scoped_tags_win_over_global_tags() {
    let tags = MockTags::new(["vServiceA/1.3.0", "vServiceA/1.2.5", "v2.0.0", "v1.0.0"]);

    let outcome = run_report_workflow(
        &Config::default(),
        &ActionsEnv::default(),
        &FixtureSource(fixture("flattened_report.json")),
        &tags,
        None::<&MockComments>,
    )
    .unwrap();

    let service_a = &outcome.report.projects[0];
    assert_eq!(service_a.version.previous_version.as_deref(), Some("1.2.5"));

    // Unchanged projects are never looked up
    let service_b = &outcome.report.projects[1];
    assert_eq!(service_b.version.previous_version, None);
    assert_eq!(tags.queries(), vec!["vServiceA/*".to_string()]);
}

#[test]
fn test_supplied_previous_version_is_kept() {
    let tags = MockTags::new(["v9.9.9"]);

    let outcome = run_report_workflow(
        &Config::default(),
        &ActionsEnv::default(),
        &FixtureSource(fixture("nested_report.json")),
        &tags,
        None::<&MockComments>,
    )
    .unwrap();

    let core = &outcome.report.projects[1];
    assert_eq!(core.version.previous_version.as_deref(), Some("1.3.2"));
    let billing = &outcome.report.projects[0];
    assert_eq!(billing.version.previous_version.as_deref(), Some("9.9.9"));
}

#[test]
fn test_full_run_in_pull_request() {
    let dir = tempfile::tempdir().unwrap();
    let env = pull_request_env(dir.path());
    let config = Config {
        repo_path: dir.path().to_path_buf(),
        output_file: Some(PathBuf::from("versions.md")),
        post_to_pr: true,
        ..Config::default()
    };
    let comments = MockComments::new()
        .with_comment(10, "Looks good")
        .with_comment(11, "## 📦 Version Report\n\nstale");

    let outcome = run_report_workflow(
        &config,
        &env,
        &FixtureSource(fixture("flattened_report.json")),
        &MockTags::new(["v1.2.0"]),
        Some(&comments),
    )
    .unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    assert_eq!(outcome.comment, Some(CommentAction::Updated(11)));
    assert!(!comments
        .calls()
        .iter()
        .any(|call| matches!(call, CommentCall::Create { .. })));

    let written = std::fs::read_to_string(dir.path().join("versions.md")).unwrap();
    assert_eq!(written, outcome.rendered);
    assert!(written.contains("| ServiceA | 1.2.0 | 1.3.0 | Dependency changed |"));

    let comment = comments.comments()[1].body.clone().unwrap();
    assert!(comment.starts_with("## 📦 Version Report\n\n# 📦 Version Report"));

    let summary = std::fs::read_to_string(dir.path().join("step_summary.md")).unwrap();
    assert_eq!(summary, format!("{}\n", outcome.rendered));

    let outputs = std::fs::read_to_string(dir.path().join("github_output")).unwrap();
    assert!(outputs.contains("total-projects=2\n"));
    assert!(outputs.contains("changed-projects=1\n"));
    assert!(outputs.contains(&format!(
        "output-file={}\n",
        dir.path().join("versions.md").display()
    )));
}

#[test]
fn test_output_file_failure_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        repo_path: dir.path().to_path_buf(),
        output_file: Some(PathBuf::from("no-such-dir/versions.json")),
        output_format: ReportFormat::Json,
        ..Config::default()
    };

    let err = run_report_workflow(
        &config,
        &ActionsEnv::default(),
        &FixtureSource(fixture("flattened_report.json")),
        &MockTags::default(),
        None::<&MockComments>,
    )
    .unwrap_err();

    assert!(matches!(err, ReportError::OutputFile { .. }));
    assert!(err.to_string().contains("no-such-dir"));
}

#[test]
fn test_json_output_keeps_every_project_when_changed_only() {
    let config = Config {
        output_format: ReportFormat::Json,
        changed_only: true,
        ..Config::default()
    };

    let outcome = run_report_workflow(
        &config,
        &ActionsEnv::default(),
        &FixtureSource(fixture("flattened_report.json")),
        &MockTags::default(),
        None::<&MockComments>,
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&outcome.rendered).unwrap();
    assert_eq!(value["projects"].as_array().unwrap().len(), 2);
    assert_eq!(value["summary"]["projectsWithChanges"], 1);
}

#[cfg(unix)]
mod with_tool {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use version_report::source::ToolExecutor;

    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("mr-version");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_run_with_external_tool() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(
            dir.path(),
            &format!("cat '{}'", fixture("nested_report.json").display()),
        );
        let config = Config {
            tool_command: tool.display().to_string(),
            output_format: ReportFormat::Text,
            changed_only: true,
            ..Config::default()
        };

        let outcome = run_report_workflow(
            &config,
            &ActionsEnv::default(),
            &ToolExecutor::from_config(&config),
            &MockTags::default(),
            None::<&MockComments>,
        )
        .unwrap();

        assert!(outcome.rendered.contains("[CHANGED] Acme.Billing"));
        assert!(!outcome.rendered.contains("[UNCHANGED] Acme.Core"));
        assert_eq!(outcome.total_projects, 3);
    }

    #[test]
    fn test_failing_tool_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "echo 'no projects found' >&2\nexit 3");
        let config = Config {
            tool_command: tool.display().to_string(),
            ..Config::default()
        };

        let err = run_report_workflow(
            &config,
            &ActionsEnv::default(),
            &ToolExecutor::from_config(&config),
            &MockTags::default(),
            None::<&MockComments>,
        )
        .unwrap_err();

        assert!(matches!(err, ReportError::Tool(_)));
        assert!(err.to_string().contains("no projects found"));
    }
}
