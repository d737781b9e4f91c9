//! Built-in rules.
//!
//! Every rule works on lines of the source text. Rules that look for
//! language constructs match against a copy of the text with string
//! literals and comments blanked out.

mod keywords;
mod max_line_length;
mod whitespace;

use serde_json::Value;

use crate::mask::mask_non_code;
use crate::{EngineError, RuleFailure};

pub use keywords::{NoDebugger, NoVarKeyword};
pub use max_line_length::MaxLineLength;
pub use whitespace::{EofLine, NoConsecutiveBlankLines, NoTrailingWhitespace};

/// Source text prepared for rule evaluation.
pub struct SourceText<'a> {
    text: &'a str,
    code: String,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            code: mask_non_code(text),
        }
    }

    /// The unmodified source text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Lines of the unmodified text, without line terminators.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'a str)> {
        self.text.lines().enumerate()
    }

    /// Lines with literals and comments blanked out.
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.code.lines().enumerate()
    }
}

/// A lint rule.
pub trait Rule: Send + Sync {
    /// Rule identifier as used in a rules document.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Evaluates the rule. Failures must be returned in source order.
    fn apply(&self, source: &SourceText<'_>, args: &[Value])
    -> Result<Vec<RuleFailure>, EngineError>;
}

/// Returns every built-in rule.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoTrailingWhitespace),
        Box::new(EofLine),
        Box::new(NoConsecutiveBlankLines),
        Box::new(NoVarKeyword),
        Box::new(NoDebugger),
        Box::new(MaxLineLength),
    ]
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Finds `word` in `line` at identifier boundaries, returning character offsets.
fn find_word(line: &str, word: &str) -> Vec<usize> {
    let chars: Vec<char> = line.chars().collect();
    let needle: Vec<char> = word.chars().collect();
    let mut found = Vec::new();

    if needle.is_empty() || chars.len() < needle.len() {
        return found;
    }

    for start in 0..=chars.len() - needle.len() {
        let end = start + needle.len();
        if chars[start..end] != needle[..] {
            continue;
        }
        let before_ok = start == 0 || !is_identifier_char(chars[start - 1]);
        let after_ok = end == chars.len() || !is_identifier_char(chars[end]);
        if before_ok && after_ok {
            found.push(start);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_word_boundaries() {
        assert_eq!(find_word("var x; var_y; avar", "var"), vec![0]);
        assert_eq!(find_word("a.var + var", "var"), vec![2, 8]);
        assert!(find_word("", "var").is_empty());
    }

    #[test]
    fn test_builtin_rule_names_unique() {
        let rules = builtin_rules();
        let mut names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_source_text_lines_align() {
        let source = SourceText::new("a // x\nb\n");
        let raw: Vec<_> = source.lines().collect();
        let code: Vec<_> = source.code_lines().collect();
        assert_eq!(raw.len(), code.len());
        assert_eq!(code[0], (0, "a     "));
    }
}
