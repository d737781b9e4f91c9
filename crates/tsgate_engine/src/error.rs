//! Engine error types.

use thiserror::Error;

/// Faults raised by the engine itself.
///
/// Rule violations are never reported through this type; they are returned
/// as [`RuleFailure`](crate::RuleFailure) values.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source text cannot be analyzed.
    #[error("Malformed input in {file}: {reason}")]
    MalformedInput { file: String, reason: String },

    /// A rule was configured with arguments it cannot use.
    #[error("Invalid arguments for rule '{rule}': {reason}")]
    InvalidRuleArguments { rule: String, reason: String },
}

impl EngineError {
    /// Creates a malformed input error.
    pub fn malformed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid rule arguments error.
    pub fn invalid_arguments(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRuleArguments {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}
