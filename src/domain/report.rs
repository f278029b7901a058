use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder used wherever the version tool left a field empty.
pub const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Canonical report for one run: every project the version tool saw.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionReport {
    pub repository: String,
    pub branch: String,
    pub branch_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_version: Option<String>,
    pub projects: Vec<ProjectReport>,
    pub summary: Summary,
}

impl VersionReport {
    /// Recomputes the summary from the project list.
    pub fn recompute_summary(&mut self) {
        self.summary = Summary::from_projects(&self.projects);
    }

    pub fn changed_projects(&self) -> impl Iterator<Item = &ProjectReport> {
        self.projects.iter().filter(|p| p.version.version_changed)
    }

    /// Projects shown in listing sections, honoring the changed-only flag.
    pub fn displayed_projects(&self, changed_only: bool) -> Vec<&ProjectReport> {
        self.projects
            .iter()
            .filter(|p| !changed_only || p.version.version_changed)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summary {
    pub total_projects: usize,
    pub projects_with_changes: usize,
    pub test_projects: usize,
    pub packable_projects: usize,
}

impl Summary {
    pub fn from_projects(projects: &[ProjectReport]) -> Self {
        Summary {
            total_projects: projects.len(),
            projects_with_changes: projects.iter().filter(|p| p.version.version_changed).count(),
            test_projects: projects.iter().filter(|p| p.is_test_project).count(),
            packable_projects: projects.iter().filter(|p| p.is_packable).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectReport {
    pub name: String,
    pub path: String,
    pub full_path: String,
    pub version: ProjectVersion,
    pub is_test_project: bool,
    pub is_packable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Dependencies>,
}

impl Default for ProjectReport {
    fn default() -> Self {
        ProjectReport {
            name: unknown(),
            path: unknown(),
            full_path: unknown(),
            version: ProjectVersion::default(),
            is_test_project: false,
            is_packable: false,
            dependencies: None,
        }
    }
}

impl ProjectReport {
    pub fn kind(&self) -> ProjectKind {
        ProjectKind::of(self)
    }

    /// Names of direct dependencies, in map order.
    pub fn direct_dependency_names(&self) -> Vec<&str> {
        self.dependencies
            .as_ref()
            .map(|deps| deps.direct.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Display classification of a project. Test takes priority over packable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Test,
    Package,
    Other,
}

impl ProjectKind {
    pub fn of(project: &ProjectReport) -> Self {
        if project.is_test_project {
            ProjectKind::Test
        } else if project.is_packable {
            ProjectKind::Package
        } else {
            ProjectKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectKind::Test => "Test",
            ProjectKind::Package => "Package",
            ProjectKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dependencies {
    pub direct: BTreeMap<String, String>,
    pub transitive: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_metadata: Option<String>,
}

/// Version information computed for one project.
///
/// `previous_version` is only meaningful when `version_changed` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectVersion {
    #[serde(default = "unknown")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sem_ver: Option<SemVer>,
    #[serde(default)]
    pub version_changed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
}

impl Default for ProjectVersion {
    fn default() -> Self {
        ProjectVersion {
            version: unknown(),
            sem_ver: None,
            version_changed: false,
            change_reason: None,
            commit_sha: None,
            commit_date: None,
            commit_message: None,
            branch_type: None,
            branch_name: None,
            commit_height: None,
            previous_version: None,
        }
    }
}
