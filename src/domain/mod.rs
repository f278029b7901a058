//! Report data model - the canonical shape every stage works on

pub mod report;

pub use report::{
    Dependencies, ProjectKind, ProjectReport, ProjectVersion, SemVer, Summary, VersionReport,
    UNKNOWN,
};
