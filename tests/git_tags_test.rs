use std::path::Path;
use std::process::Command;

use version_report::domain::{ProjectReport, ProjectVersion, VersionReport};
use version_report::git::{GitCli, TagSource};
use version_report::resolver::PreviousVersionResolver;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=Release Bot", "-c", "user.email=bot@example.com"])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Repository with one commit carrying every given tag, or `None` without git.
fn tagged_repo(tags: &[&str]) -> Option<tempfile::TempDir> {
    if Command::new("git").arg("--version").output().is_err() {
        eprintln!("git not installed, skipping");
        return None;
    }

    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "--quiet"]);
    git(dir.path(), &["commit", "--quiet", "--allow-empty", "-m", "initial"]);
    for tag in tags {
        git(dir.path(), &["tag", tag]);
    }
    Some(dir)
}

fn changed(name: &str, version: &str) -> ProjectReport {
    ProjectReport {
        name: name.to_string(),
        version: ProjectVersion {
            version: version.to_string(),
            version_changed: true,
            ..ProjectVersion::default()
        },
        ..ProjectReport::default()
    }
}

#[test]
fn test_tags_are_listed_highest_version_first() {
    let Some(repo) = tagged_repo(&["vServiceA/1.1.0", "vServiceA/1.2.0", "vServiceA/1.10.0"]) else {
        return;
    };

    let tags = GitCli::new(repo.path()).list_tags("vServiceA/*").unwrap();
    assert_eq!(
        tags,
        vec!["vServiceA/1.10.0", "vServiceA/1.2.0", "vServiceA/1.1.0"]
    );
}

#[test]
fn test_previous_version_from_scoped_tags() {
    let Some(repo) = tagged_repo(&["vServiceA/1.1.0", "vServiceA/1.2.0", "vServiceA/1.10.0"]) else {
        return;
    };
    let git = GitCli::new(repo.path());
    let resolver = PreviousVersionResolver::new(&git, "v");

    assert_eq!(
        resolver.find_previous("ServiceA", "1.10.0").unwrap().as_deref(),
        Some("1.2.0")
    );

    let mut report = VersionReport {
        projects: vec![changed("ServiceA", "1.2.0")],
        ..VersionReport::default()
    };
    let warnings = resolver.enhance(&mut report);

    assert!(warnings.is_empty());
    assert_eq!(
        report.projects[0].version.previous_version.as_deref(),
        Some("1.10.0")
    );
}

#[test]
fn test_global_tags_used_when_no_scoped_tag_qualifies() {
    let Some(repo) = tagged_repo(&["v1.0.0", "v1.1.0", "vServiceB/3.0.0"]) else {
        return;
    };
    let git = GitCli::new(repo.path());
    let resolver = PreviousVersionResolver::new(&git, "v");

    assert_eq!(
        resolver.find_previous("ServiceA", "1.1.0").unwrap().as_deref(),
        Some("1.0.0")
    );
    assert_eq!(resolver.find_previous("ServiceA", "9.9.9").unwrap().as_deref(), Some("1.1.0"));
}

#[test]
fn test_repository_without_matching_tags() {
    let Some(repo) = tagged_repo(&[]) else {
        return;
    };
    let git = GitCli::new(repo.path());

    assert!(git.list_tags("v*").unwrap().is_empty());
    let resolver = PreviousVersionResolver::new(&git, "v");
    assert_eq!(resolver.find_previous("ServiceA", "1.0.0").unwrap(), None);
}
