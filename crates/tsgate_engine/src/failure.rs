//! Engine-native failure types.

use serde::{Deserialize, Serialize};

/// Severity attached to a rule failure.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Error - fails the file.
    #[default]
    Error,
    /// Warning - reported, does not fail the file.
    Warning,
    /// Info - informational message.
    Info,
}

/// Zero-based position in the source text.
///
/// `character` counts Unicode scalar values from the start of the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A single rule violation as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleFailure {
    /// The rule that produced this failure.
    pub rule_name: String,

    /// Human-readable failure text.
    pub failure: String,

    /// Where the failure starts.
    pub position: Position,

    /// Severity level.
    #[serde(default)]
    pub severity: RuleSeverity,
}

impl RuleFailure {
    /// Creates a new error-level failure.
    pub fn new(rule_name: impl Into<String>, failure: impl Into<String>, position: Position) -> Self {
        Self {
            rule_name: rule_name.into(),
            failure: failure.into(),
            position,
            severity: RuleSeverity::Error,
        }
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: RuleSeverity) -> Self {
        self.severity = severity;
        self
    }
}
