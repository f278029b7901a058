use tracing::{debug, warn};

use crate::domain::{ProjectReport, VersionReport};
use crate::error::Result;
use crate::git::TagSource;
use crate::warning::RunWarning;

/// Fills in `previousVersion` for changed projects from version tags.
pub struct PreviousVersionResolver<'a, T: TagSource> {
    tags: &'a T,
    tag_prefix: String,
}

impl<'a, T: TagSource> PreviousVersionResolver<'a, T> {
    pub fn new(tags: &'a T, tag_prefix: impl Into<String>) -> Self {
        PreviousVersionResolver {
            tags,
            tag_prefix: tag_prefix.into(),
        }
    }

    /// Resolve previous versions for every changed project that lacks one.
    ///
    /// Lookup failures never abort: they leave the project untouched and are
    /// returned as warnings.
    pub fn enhance(&self, report: &mut VersionReport) -> Vec<RunWarning> {
        let mut warnings = Vec::new();

        for project in report.projects.iter_mut().filter(|p| needs_lookup(p)) {
            match self.find_previous(&project.name, &project.version.version) {
                Ok(Some(previous)) => {
                    debug!(project = %project.name, %previous, "resolved previous version");
                    project.version.previous_version = Some(previous);
                }
                Ok(None) => {
                    debug!(project = %project.name, "no previous version tag found");
                }
                Err(e) => {
                    warn!(project = %project.name, error = %e, "previous version lookup failed");
                    warnings.push(RunWarning::PreviousVersionLookup {
                        project: project.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        warnings
    }

    /// Look for the newest tag that differs from `current`.
    ///
    /// Project-scoped tags (`<prefix><name>/<version>`) are tried first; global
    /// tags (`<prefix><version>`) only when no scoped tag qualifies.
    pub fn find_previous(&self, project_name: &str, current: &str) -> Result<Option<String>> {
        let scoped_prefix = format!("{}{}/", self.tag_prefix, project_name);
        let scoped = self.tags.list_tags(&format!("{}*", scoped_prefix))?;
        if let Some(previous) = first_differing(&scoped, &scoped_prefix, current, false) {
            return Ok(Some(previous));
        }

        let global = self.tags.list_tags(&format!("{}*", self.tag_prefix))?;
        Ok(first_differing(&global, &self.tag_prefix, current, true))
    }
}

fn needs_lookup(project: &ProjectReport) -> bool {
    project.version.version_changed && project.version.previous_version.is_none()
}

/// Walk tags in the order given and return the first stripped value that
/// differs from `current`.
fn first_differing(
    tags: &[String],
    prefix: &str,
    current: &str,
    skip_scoped: bool,
) -> Option<String> {
    tags.iter()
        .filter(|tag| !(skip_scoped && tag.contains('/')))
        .filter_map(|tag| tag.strip_prefix(prefix))
        .find(|version| !version.is_empty() && *version != current)
        .map(str::to_string)
}
