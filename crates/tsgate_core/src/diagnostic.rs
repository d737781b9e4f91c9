//! Diagnostic model used by the build stage.

use serde::{Deserialize, Serialize};
use tsgate_engine::{RuleFailure, RuleSeverity};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Upper-case label used in formatted output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl From<RuleSeverity> for Severity {
    fn from(severity: RuleSeverity) -> Self {
        match severity {
            RuleSeverity::Error => Severity::Error,
            RuleSeverity::Warning => Severity::Warning,
            RuleSeverity::Info => Severity::Info,
        }
    }
}

/// A single diagnostic tied to a file, line and column.
///
/// `line` and `column` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file_path: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub rule_name: String,
}

impl Diagnostic {
    /// Converts an engine failure reported for `file_path`.
    pub fn from_failure(file_path: &str, failure: RuleFailure) -> Self {
        Self {
            severity: failure.severity.into(),
            file_path: file_path.to_string(),
            line: failure.position.line + 1,
            column: failure.position.character + 1,
            message: failure.failure,
            rule_name: failure.rule_name,
        }
    }

    /// Returns true if this diagnostic fails its file.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
