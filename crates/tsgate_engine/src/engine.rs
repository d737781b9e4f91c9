//! Engine abstraction and the built-in implementation.

use tracing::{debug, trace};

use crate::rules::{Rule, SourceText, builtin_rules};
use crate::{EngineError, RuleFailure, RuleSet};

/// Evaluates a rule set against one source file.
///
/// Implementations must be deterministic: identical input yields identical
/// failures in identical order.
pub trait LintEngine: Send + Sync {
    /// Lints `source`, returning failures in emission order.
    ///
    /// Rule violations are data; `Err` is reserved for engine faults.
    fn lint(
        &self,
        file_name: &str,
        source: &str,
        rules: &RuleSet,
    ) -> Result<Vec<RuleFailure>, EngineError>;

    /// Returns whether the engine knows a rule by this name.
    fn supports_rule(&self, _name: &str) -> bool {
        true
    }
}

/// Engine backed by the rules in [`crate::rules`].
pub struct BuiltinEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl BuiltinEngine {
    /// Creates an engine with every built-in rule.
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Returns `(name, description)` for every rule, in registration order.
    pub fn rule_descriptions(&self) -> Vec<(&'static str, &'static str)> {
        self.rules
            .iter()
            .map(|rule| (rule.name(), rule.description()))
            .collect()
    }

    fn find(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|rule| rule.name() == name)
            .map(|rule| &**rule)
    }
}

impl Default for BuiltinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LintEngine for BuiltinEngine {
    fn lint(
        &self,
        file_name: &str,
        source: &str,
        rules: &RuleSet,
    ) -> Result<Vec<RuleFailure>, EngineError> {
        if let Some(offset) = source.find('\0') {
            return Err(EngineError::malformed(
                file_name,
                format!("unexpected NUL byte at offset {}", offset),
            ));
        }

        let text = SourceText::new(source);
        let mut failures = Vec::new();

        for (name, setting) in rules.enabled() {
            let Some(rule) = self.find(name) else {
                debug!("Skipping unknown rule '{}' for {}", name, file_name);
                continue;
            };

            let severity = setting.severity();
            let found = rule.apply(&text, &setting.arguments())?;
            trace!("Rule '{}' reported {} failures in {}", name, found.len(), file_name);
            failures.extend(found.into_iter().map(|f| f.with_severity(severity)));
        }

        Ok(failures)
    }

    fn supports_rule(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}
