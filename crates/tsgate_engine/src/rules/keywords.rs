//! Keyword rules.

use serde_json::Value;

use super::{Rule, SourceText, find_word};
use crate::{EngineError, Position, RuleFailure};

/// Disallows `var` declarations.
pub struct NoVarKeyword;

impl NoVarKeyword {
    /// A `var` only declares when it starts a statement (or follows `export`).
    fn starts_declaration(line: &[char], offset: usize) -> bool {
        if !line
            .get(offset + 3)
            .is_some_and(|c| c.is_whitespace())
        {
            return false;
        }

        let prefix: String = line[..offset].iter().collect();
        let prefix = prefix.trim_end();
        if prefix.is_empty() {
            return true;
        }
        if let Some(before) = prefix.strip_suffix("export") {
            return before.is_empty() || before.ends_with(|c: char| !super::is_identifier_char(c));
        }
        prefix.ends_with([';', '{', '}', '('])
    }
}

impl Rule for NoVarKeyword {
    fn name(&self) -> &'static str {
        "no-var-keyword"
    }

    fn description(&self) -> &'static str {
        "Disallow the 'var' keyword"
    }

    fn apply(
        &self,
        source: &SourceText<'_>,
        _args: &[Value],
    ) -> Result<Vec<RuleFailure>, EngineError> {
        let mut failures = Vec::new();
        for (line_no, line) in source.code_lines() {
            let chars: Vec<char> = line.chars().collect();
            for offset in find_word(line, "var") {
                if Self::starts_declaration(&chars, offset) {
                    failures.push(RuleFailure::new(
                        self.name(),
                        "Forbidden 'var' keyword, use 'let' or 'const' instead",
                        Position::new(line_no, offset),
                    ));
                }
            }
        }
        Ok(failures)
    }
}

/// Disallows `debugger` statements.
pub struct NoDebugger;

impl Rule for NoDebugger {
    fn name(&self) -> &'static str {
        "no-debugger"
    }

    fn description(&self) -> &'static str {
        "Disallow debugger statements"
    }

    fn apply(
        &self,
        source: &SourceText<'_>,
        _args: &[Value],
    ) -> Result<Vec<RuleFailure>, EngineError> {
        let mut failures = Vec::new();
        for (line_no, line) in source.code_lines() {
            for offset in find_word(line, "debugger") {
                failures.push(RuleFailure::new(
                    self.name(),
                    "Use of debugger statements is forbidden",
                    Position::new(line_no, offset),
                ));
            }
        }
        Ok(failures)
    }
}
