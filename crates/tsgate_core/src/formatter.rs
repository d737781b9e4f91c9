//! Diagnostic formatting.

use crate::Diagnostic;

/// Formats a diagnostic as
/// `<SEVERITY>: <file>[<line>, <column>]: <message> (<rule>)`.
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format!(
        "{}: {}[{}, {}]: {} ({})",
        diagnostic.severity.label(),
        diagnostic.file_path,
        diagnostic.line,
        diagnostic.column,
        diagnostic.message,
        diagnostic.rule_name
    )
}

/// Formats every diagnostic, keeping their order.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(format_diagnostic).collect()
}

/// Joins formatted lines into the text embedded in generated tests:
/// every line followed by a newline.
pub fn diagnostic_text(lines: &[String]) -> String {
    lines.iter().fold(String::new(), |mut text, line| {
        text.push_str(line);
        text.push('\n');
        text
    })
}
