use serde_json::Value;

use super::{Rule, SourceText};
use crate::{EngineError, Position, RuleFailure};

const DEFAULT_LIMIT: usize = 120;

/// Limits the number of characters on a line.
pub struct MaxLineLength;

impl MaxLineLength {
    fn limit(&self, args: &[Value]) -> Result<usize, EngineError> {
        match args.first() {
            None => Ok(DEFAULT_LIMIT),
            Some(value) => value
                .as_u64()
                .filter(|limit| *limit > 0)
                .map(|limit| limit as usize)
                .ok_or_else(|| {
                    EngineError::invalid_arguments(
                        self.name(),
                        format!("expected a positive integer limit, got {}", value),
                    )
                }),
        }
    }
}

impl Rule for MaxLineLength {
    fn name(&self) -> &'static str {
        "max-line-length"
    }

    fn description(&self) -> &'static str {
        "Limit the maximum length of a line"
    }

    fn apply(
        &self,
        source: &SourceText<'_>,
        args: &[Value],
    ) -> Result<Vec<RuleFailure>, EngineError> {
        let limit = self.limit(args)?;
        let failures = source
            .lines()
            .filter(|(_, line)| line.chars().count() > limit)
            .map(|(line_no, _)| {
                RuleFailure::new(
                    self.name(),
                    format!("Exceeds maximum line length of {}", limit),
                    Position::new(line_no, 0),
                )
            })
            .collect();
        Ok(failures)
    }
}
