//! Whitespace and line-ending rules.

use serde_json::Value;

use super::{Rule, SourceText};
use crate::{EngineError, Position, RuleFailure};

/// Disallows trailing spaces and tabs at the end of a line.
pub struct NoTrailingWhitespace;

impl Rule for NoTrailingWhitespace {
    fn name(&self) -> &'static str {
        "no-trailing-whitespace"
    }

    fn description(&self) -> &'static str {
        "Disallow trailing whitespace at the end of a line"
    }

    fn apply(
        &self,
        source: &SourceText<'_>,
        _args: &[Value],
    ) -> Result<Vec<RuleFailure>, EngineError> {
        let mut failures = Vec::new();
        for (line_no, line) in source.lines() {
            let trimmed = line.trim_end_matches([' ', '\t']);
            if trimmed.len() < line.len() {
                failures.push(RuleFailure::new(
                    self.name(),
                    "trailing whitespace",
                    Position::new(line_no, trimmed.chars().count()),
                ));
            }
        }
        Ok(failures)
    }
}

/// Requires a non-empty file to end with a newline.
pub struct EofLine;

impl Rule for EofLine {
    fn name(&self) -> &'static str {
        "eofline"
    }

    fn description(&self) -> &'static str {
        "Require files to end with a newline"
    }

    fn apply(
        &self,
        source: &SourceText<'_>,
        _args: &[Value],
    ) -> Result<Vec<RuleFailure>, EngineError> {
        let text = source.text();
        if text.is_empty() || text.ends_with('\n') {
            return Ok(Vec::new());
        }

        let line = text.matches('\n').count();
        let last = text.rsplit('\n').next().unwrap_or_default();
        Ok(vec![RuleFailure::new(
            self.name(),
            "file should end with a newline",
            Position::new(line, last.chars().count()),
        )])
    }
}

/// Disallows more than one blank line in a row.
pub struct NoConsecutiveBlankLines;

impl Rule for NoConsecutiveBlankLines {
    fn name(&self) -> &'static str {
        "no-consecutive-blank-lines"
    }

    fn description(&self) -> &'static str {
        "Disallow consecutive blank lines"
    }

    fn apply(
        &self,
        source: &SourceText<'_>,
        _args: &[Value],
    ) -> Result<Vec<RuleFailure>, EngineError> {
        let mut failures = Vec::new();
        let mut previous_blank = false;
        for (line_no, line) in source.lines() {
            let blank = line.trim().is_empty();
            if blank && previous_blank {
                failures.push(RuleFailure::new(
                    self.name(),
                    "Consecutive blank lines are forbidden",
                    Position::new(line_no, 0),
                ));
            }
            previous_blank = blank;
        }
        Ok(failures)
    }
}
