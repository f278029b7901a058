use crate::domain::VersionReport;

/// Pretty-printed JSON with 2-space indentation and declaration field order.
pub fn render(report: &VersionReport) -> String {
    // Only plain strings, numbers and string-keyed maps: serialization cannot fail.
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
