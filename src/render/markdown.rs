use crate::domain::{ProjectReport, VersionReport};

pub const TITLE: &str = "# 📦 Version Report";
const CHANGE_MARKER: &str = "🔄";

/// Table cells cannot hold pipes or line breaks.
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn table(lines: &mut Vec<String>, columns: &[&str], rows: Vec<Vec<String>>) {
    lines.push(format!("| {} |", columns.join(" | ")));
    lines.push(format!(
        "|{}|",
        columns
            .iter()
            .map(|c| "-".repeat(c.chars().count() + 2))
            .collect::<Vec<_>>()
            .join("|")
    ));
    for row in rows {
        lines.push(format!("| {} |", row.join(" | ")));
    }
    lines.push(String::new());
}

fn preamble(lines: &mut Vec<String>, report: &VersionReport) {
    lines.push(TITLE.to_string());
    lines.push(String::new());
    lines.push(format!("- **Repository:** {}", report.repository));
    lines.push(format!(
        "- **Branch:** {} ({})",
        report.branch, report.branch_type
    ));
    if let Some(global) = &report.global_version {
        lines.push(format!("- **Global Version:** {}", global));
    }
    lines.push(String::new());
}

fn summary(lines: &mut Vec<String>, report: &VersionReport) {
    let s = &report.summary;
    lines.push("## Summary".to_string());
    lines.push(String::new());
    table(
        lines,
        &["Metric", "Count"],
        vec![
            vec!["Total Projects".to_string(), s.total_projects.to_string()],
            vec!["Changed Projects".to_string(), s.projects_with_changes.to_string()],
            vec!["Test Projects".to_string(), s.test_projects.to_string()],
            vec!["Packable Projects".to_string(), s.packable_projects.to_string()],
        ],
    );
}

/// Always lists every changed project, whatever the changed-only flag says.
fn changed_projects(lines: &mut Vec<String>, report: &VersionReport) {
    let changed: Vec<&ProjectReport> = report.changed_projects().collect();
    if changed.is_empty() {
        return;
    }

    lines.push("## Changed Projects".to_string());
    lines.push(String::new());
    let rows = changed
        .iter()
        .map(|p| {
            vec![
                cell(&p.name),
                cell(p.version.previous_version.as_deref().unwrap_or("N/A")),
                cell(&p.version.version),
                cell(p.version.change_reason.as_deref().unwrap_or("-")),
            ]
        })
        .collect();
    table(
        lines,
        &["Project", "Previous Version", "New Version", "Reason"],
        rows,
    );
}

fn projects(lines: &mut Vec<String>, displayed: &[&ProjectReport], changed_only: bool) {
    lines.push(if changed_only {
        "## Projects (Changed Only)".to_string()
    } else {
        "## All Projects".to_string()
    });
    lines.push(String::new());

    if displayed.is_empty() {
        lines.push("_No projects to display._".to_string());
        lines.push(String::new());
        return;
    }

    let rows = displayed
        .iter()
        .map(|p| {
            let name = if p.version.version_changed {
                format!("{} {}", cell(&p.name), CHANGE_MARKER)
            } else {
                cell(&p.name)
            };
            vec![
                name,
                cell(&p.version.version),
                p.kind().label().to_string(),
                format!("`{}`", cell(&p.path)),
            ]
        })
        .collect();
    table(lines, &["Project", "Version", "Type", "Path"], rows);
}

fn dependencies(lines: &mut Vec<String>, displayed: &[&ProjectReport]) {
    let with_deps: Vec<&&ProjectReport> = displayed
        .iter()
        .filter(|p| {
            p.dependencies
                .as_ref()
                .is_some_and(|deps| !deps.direct.is_empty())
        })
        .collect();
    if with_deps.is_empty() {
        return;
    }

    lines.push("## Dependencies".to_string());
    lines.push(String::new());
    for project in with_deps {
        lines.push(format!("### {}", project.name));
        lines.push(String::new());
        if let Some(deps) = &project.dependencies {
            for (name, version) in &deps.direct {
                lines.push(format!("- `{}` `{}`", name, version));
            }
        }
        lines.push(String::new());
    }
}

/// Markdown document: preamble, summary table, changed projects, project
/// table and per-project dependency lists.
pub fn render(report: &VersionReport, changed_only: bool) -> String {
    let displayed = report.displayed_projects(changed_only);
    let mut lines = Vec::new();

    preamble(&mut lines, report);
    summary(&mut lines, report);
    changed_projects(&mut lines, report);
    projects(&mut lines, &displayed, changed_only);
    dependencies(&mut lines, &displayed);

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
