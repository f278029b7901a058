use crate::domain::{ProjectReport, VersionReport};

pub const HEADER: &str = "Project,Version,Previous Version,Changed,Reason,Type,Path,Dependencies";

/// Every field is quoted, numbers and booleans included. Embedded quotes are
/// doubled.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn row(project: &ProjectReport) -> String {
    let version = &project.version;
    let dependencies = project.direct_dependency_names().join(";");
    let fields = [
        project.name.as_str(),
        version.version.as_str(),
        version.previous_version.as_deref().unwrap_or(""),
        if version.version_changed { "true" } else { "false" },
        version.change_reason.as_deref().unwrap_or(""),
        project.kind().label(),
        project.path.as_str(),
        dependencies.as_str(),
    ];

    fields.iter().map(|f| quote(f)).collect::<Vec<_>>().join(",")
}

pub fn render(report: &VersionReport, changed_only: bool) -> String {
    std::iter::once(HEADER.to_string())
        .chain(report.displayed_projects(changed_only).into_iter().map(row))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::sample_report;

    fn naive_split(line: &str) -> Vec<String> {
        line.split(',').map(|f| f.trim_matches('"').to_string()).collect()
    }

    #[test]
    fn test_header_and_rows() {
        let output = render(&sample_report(), false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert_eq!(
            lines[1],
            r#""Acme.Api","1.2.0","1.1.0","true","Commits since last tag","Package","src/Acme.Api","Acme.Core;Serilog""#
        );
        assert_eq!(
            lines[2],
            r#""Acme.Api.Tests","1.0.0","","false","","Test","tests/Acme.Api.Tests","""#
        );
    }

    #[test]
    fn test_fields_recoverable_by_naive_split() {
        let report = sample_report();
        let output = render(&report, false);

        for (line, project) in output.lines().skip(1).zip(&report.projects) {
            let fields = naive_split(line);
            assert_eq!(fields.len(), 8);
            assert_eq!(fields[0], project.name);
            assert_eq!(fields[1], project.version.version);
            assert_eq!(fields[3], project.version.version_changed.to_string());
            assert_eq!(fields[5], project.kind().label());
            assert_eq!(fields[6], project.path);
        }
    }

    #[test]
    fn test_changed_only_filters_rows() {
        let output = render(&sample_report(), true);
        let names: Vec<String> = output
            .lines()
            .skip(1)
            .map(|line| naive_split(line)[0].clone())
            .collect();
        assert_eq!(names, vec!["Acme.Api", "Acme.Tool"]);
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let mut report = sample_report();
        report.projects[0].version.change_reason = Some(r#"bumped "core""#.to_string());
        let output = render(&report, false);
        assert!(output.contains(r#""bumped ""core""""#));
    }

    #[test]
    fn test_empty_report_is_header_only() {
        let output = render(&Default::default(), false);
        assert_eq!(output, HEADER);
    }
}
