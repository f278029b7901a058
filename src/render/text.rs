use crate::domain::{ProjectReport, VersionReport};

fn header(report: &VersionReport) -> Vec<String> {
    let mut lines = vec![
        "Version Report".to_string(),
        format!("Repository: {}", report.repository),
        format!("Branch: {} ({})", report.branch, report.branch_type),
    ];
    if let Some(global) = &report.global_version {
        lines.push(format!("Global Version: {}", global));
    }

    let summary = &report.summary;
    lines.push(format!(
        "Projects: {} total, {} changed, {} test, {} packable",
        summary.total_projects,
        summary.projects_with_changes,
        summary.test_projects,
        summary.packable_projects
    ));
    lines
}

fn block(project: &ProjectReport) -> String {
    let version = &project.version;
    let status = if version.version_changed {
        "[CHANGED]"
    } else {
        "[UNCHANGED]"
    };

    let mut lines = vec![
        format!("{} {}", status, project.name),
        format!("  Version: {}", version.version),
        format!("  Path: {}", project.path),
    ];

    if version.version_changed {
        lines.push(format!(
            "  Previous: {}",
            version.previous_version.as_deref().unwrap_or("N/A")
        ));
        if let Some(reason) = &version.change_reason {
            lines.push(format!("  Reason: {}", reason));
        }
    }

    let deps = project.direct_dependency_names();
    if !deps.is_empty() {
        lines.push(format!("  Dependencies: {}", deps.join(", ")));
    }

    lines.join("\n")
}

/// Plain text: header lines, then one block per project separated by blank lines.
pub fn render(report: &VersionReport, changed_only: bool) -> String {
    let mut sections = vec![header(report).join("\n")];
    sections.extend(report.displayed_projects(changed_only).into_iter().map(block));
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::sample_report;

    #[test]
    fn test_header_lines() {
        let output = render(&sample_report(), false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Version Report");
        assert_eq!(lines[1], "Repository: acme/platform");
        assert_eq!(lines[2], "Branch: main (Main)");
        assert_eq!(lines[3], "Global Version: 4.2.0");
        assert_eq!(lines[4], "Projects: 3 total, 2 changed, 1 test, 2 packable");
    }

    #[test]
    fn test_changed_block() {
        let output = render(&sample_report(), false);
        assert!(output.contains(
            "[CHANGED] Acme.Api\n  Version: 1.2.0\n  Path: src/Acme.Api\n  Previous: 1.1.0\n  Reason: Commits since last tag\n  Dependencies: Acme.Core, Serilog"
        ));
        assert!(output.contains("[CHANGED] Acme.Tool\n  Version: 0.3.0\n  Path: tools/Acme.Tool\n  Previous: N/A"));
    }

    #[test]
    fn test_unchanged_block_has_no_previous_or_reason() {
        let output = render(&sample_report(), false);
        let block = output
            .split("\n\n")
            .find(|b| b.starts_with("[UNCHANGED] Acme.Api.Tests"))
            .unwrap();
        assert!(!block.contains("Previous"));
        assert!(!block.contains("Reason"));
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let output = render(&sample_report(), false);
        let blocks: Vec<&str> = output.split("\n\n").collect();
        assert_eq!(blocks.len(), 4);
        assert!(blocks[1].starts_with("[CHANGED] Acme.Api"));
        assert!(blocks[2].starts_with("[UNCHANGED] Acme.Api.Tests"));
    }

    #[test]
    fn test_changed_only() {
        let output = render(&sample_report(), true);
        assert!(!output.contains("[UNCHANGED]"));
        assert_eq!(output.matches("[CHANGED]").count(), 2);
    }

    #[test]
    fn test_no_global_version_line() {
        let mut report = sample_report();
        report.global_version = None;
        assert!(!render(&report, false).contains("Global Version"));
    }
}
