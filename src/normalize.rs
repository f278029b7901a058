//! Decoding of the version tool's JSON into the canonical [`VersionReport`].
//!
//! The tool has emitted two project shapes over time:
//!
//! - nested: `{"name": "Api", "version": {"version": "1.2.0", "versionChanged": true}}`
//! - flattened: `{"name": "Api", "version": "1.2.0", "versionChanged": true}`
//!
//! Both are decoded into a [`VersionShape`] at the boundary and reconciled by
//! [`reconcile`], so the rest of the pipeline only ever sees [`ProjectVersion`].

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::domain::{Dependencies, ProjectReport, ProjectVersion, SemVer, VersionReport, UNKNOWN};
use crate::error::Result;
use crate::version::parse_sem_ver;

/// Top-level payload as emitted by the version tool.
#[derive(Debug)]
pub enum RawPayload {
    /// Payload with a `projects` array whose entries need reconciling
    Projects(RawReport),
    /// Anything else is taken to already be a canonical report
    Canonical(VersionReport),
}

impl RawPayload {
    /// Decodes raw tool output. Invalid JSON is an error carrying the parser detail.
    pub fn decode(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;

        if matches!(value.get("projects"), Some(Value::Array(_))) {
            Ok(RawPayload::Projects(serde_json::from_value(value)?))
        } else {
            debug!("payload has no projects array, decoding as canonical report");
            Ok(RawPayload::Canonical(serde_json::from_value(value)?))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawReport {
    repository: Option<String>,
    branch: Option<String>,
    branch_type: Option<String>,
    global_version: Option<String>,
    projects: Vec<RawProject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    project: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    full_path: Option<String>,
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    is_test_project: Option<bool>,
    #[serde(default)]
    is_packable: Option<bool>,
    #[serde(default)]
    dependencies: Option<Dependencies>,
    #[serde(flatten)]
    flat: FlatVersion,
}

/// Version fields as decoded from either shape: siblings of `name`/`path`
/// when flattened, members of the `version` object when nested.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlatVersion {
    /// Taken from the project's `version` string, never from a sibling key
    #[serde(skip)]
    pub version: Option<String>,
    pub sem_ver: Option<SemVer>,
    pub version_changed: Option<bool>,
    pub change_reason: Option<String>,
    pub commit_sha: Option<String>,
    pub commit_date: Option<String>,
    pub commit_message: Option<String>,
    pub branch_type: Option<String>,
    pub branch_name: Option<String>,
    pub commit_height: Option<u64>,
    pub previous_version: Option<String>,
}

/// How a project entry carried its version information.
///
/// Both variants hold nullable fields, so `null` and a missing key default
/// the same way whichever shape the tool used.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionShape {
    Nested(FlatVersion),
    Flattened(FlatVersion),
}

impl RawProject {
    /// The `version` field decides the shape: an object holding a `version`
    /// key is nested, everything else is flattened.
    fn shape(&mut self) -> Result<VersionShape> {
        match self.version.take() {
            Some(Value::Object(mut map)) if map.contains_key("version") => {
                let version = map.remove("version").and_then(version_string);
                let mut nested: FlatVersion = serde_json::from_value(Value::Object(map))?;
                nested.version = version;
                Ok(VersionShape::Nested(nested))
            }
            other => {
                let mut flat = std::mem::take(&mut self.flat);
                flat.version = other.and_then(version_string);
                Ok(VersionShape::Flattened(flat))
            }
        }
    }
}

fn version_string(value: Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Turns either shape into a canonical [`ProjectVersion`].
///
/// Missing semantic version fields are derived from the version string.
pub fn reconcile(shape: VersionShape) -> ProjectVersion {
    let (VersionShape::Nested(fields) | VersionShape::Flattened(fields)) = shape;
    let mut version = ProjectVersion {
        version: fields.version.unwrap_or_else(|| UNKNOWN.to_string()),
        sem_ver: fields.sem_ver,
        version_changed: fields.version_changed.unwrap_or(false),
        change_reason: fields.change_reason,
        commit_sha: fields.commit_sha,
        commit_date: fields.commit_date,
        commit_message: fields.commit_message,
        branch_type: fields.branch_type,
        branch_name: fields.branch_name,
        commit_height: fields.commit_height,
        previous_version: fields.previous_version,
    };

    if version.sem_ver.is_none() {
        version.sem_ver = parse_sem_ver(&version.version);
    }
    version
}

/// Produces the canonical report from raw tool output.
///
/// Summary counts are always recomputed from the project list.
pub fn normalize(raw: &str, config: &Config) -> Result<VersionReport> {
    let mut report = match RawPayload::decode(raw)? {
        RawPayload::Projects(raw_report) => from_raw_report(raw_report, config)?,
        RawPayload::Canonical(report) => report,
    };

    fill_header_defaults(&mut report, config);
    report.recompute_summary();

    debug!(
        projects = report.summary.total_projects,
        changed = report.summary.projects_with_changes,
        "normalized version report"
    );
    Ok(report)
}

fn from_raw_report(raw: RawReport, config: &Config) -> Result<VersionReport> {
    let projects = raw
        .projects
        .into_iter()
        .map(|project| project_report(project, &config.repo_path))
        .collect::<Result<Vec<_>>>()?;

    Ok(VersionReport {
        repository: raw.repository.unwrap_or_default(),
        branch: raw.branch.unwrap_or_default(),
        branch_type: raw.branch_type.unwrap_or_default(),
        global_version: raw.global_version,
        projects,
        summary: Default::default(),
    })
}

fn project_report(mut raw: RawProject, repo_path: &Path) -> Result<ProjectReport> {
    let version = reconcile(raw.shape()?);

    let name = raw
        .name
        .or(raw.project)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let path = raw.path.unwrap_or_else(|| UNKNOWN.to_string());
    let full_path = raw
        .full_path
        .unwrap_or_else(|| repo_path.join(&path).display().to_string());

    Ok(ProjectReport {
        name,
        path,
        full_path,
        version,
        is_test_project: raw.is_test_project.unwrap_or(false),
        is_packable: raw.is_packable.unwrap_or(false),
        dependencies: raw.dependencies,
    })
}

fn fill_header_defaults(report: &mut VersionReport, config: &Config) {
    if report.repository.is_empty() {
        report.repository = config.repo_path.display().to_string();
    }
    if report.branch.is_empty() {
        report.branch = config
            .branch
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string());
    }
    if report.branch_type.is_empty() {
        report.branch_type = UNKNOWN.to_string();
    }
}
