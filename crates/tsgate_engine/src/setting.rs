//! Rule settings as written in a rules document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RuleSeverity;

/// Severity name accepted in a rules document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    #[serde(alias = "warn")]
    Warning,
    Info,
    #[serde(alias = "none")]
    Off,
}

impl Level {
    fn severity(self) -> RuleSeverity {
        match self {
            Level::Warning => RuleSeverity::Warning,
            Level::Info => RuleSeverity::Info,
            Level::Error | Level::Off => RuleSeverity::Error,
        }
    }
}

/// Object form of a rule setting: `{ "severity": "warning", "options": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSettingDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

/// Configuration for a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// `true` / `false`.
    Enabled(bool),
    /// `"error"`, `"warning"`, `"info"` or `"off"`.
    Level(Level),
    /// `[true, arg1, arg2, ...]`.
    Arguments(Vec<Value>),
    /// Object form.
    Detail(RuleSettingDetail),
}

impl RuleSetting {
    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleSetting::Enabled(enabled) => *enabled,
            RuleSetting::Level(level) => *level != Level::Off,
            RuleSetting::Arguments(args) => matches!(args.first(), Some(Value::Bool(true))),
            RuleSetting::Detail(detail) => detail.severity != Some(Level::Off),
        }
    }

    /// Returns the severity failures of this rule are reported with.
    pub fn severity(&self) -> RuleSeverity {
        match self {
            RuleSetting::Level(level) => level.severity(),
            RuleSetting::Detail(RuleSettingDetail {
                severity: Some(level),
                ..
            }) => level.severity(),
            _ => RuleSeverity::Error,
        }
    }

    /// Returns the rule arguments, without the leading enable flag.
    pub fn arguments(&self) -> Vec<Value> {
        match self {
            RuleSetting::Enabled(_) | RuleSetting::Level(_) => Vec::new(),
            RuleSetting::Arguments(args) => args.iter().skip(1).cloned().collect(),
            RuleSetting::Detail(detail) => match &detail.options {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items.clone(),
                Some(other) => vec![other.clone()],
            },
        }
    }

    /// Checks structural constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let RuleSetting::Arguments(args) = self
            && !matches!(args.first(), Some(Value::Bool(_)))
        {
            return Err("array settings must start with a boolean enable flag".to_string());
        }
        Ok(())
    }
}

/// Ordered collection of rule settings.
///
/// Order is the document order and determines the order in which rules run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<(String, RuleSetting)>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a rule setting, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, setting: RuleSetting) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = setting,
            None => self.entries.push((name, setting)),
        }
    }

    /// Gets the setting for a rule.
    pub fn get(&self, name: &str) -> Option<&RuleSetting> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, setting)| setting)
    }

    /// Iterates over all settings in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.entries.iter().map(|(name, setting)| (name.as_str(), setting))
    }

    /// Iterates over enabled settings in order.
    pub fn enabled(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.iter().filter(|(_, setting)| setting.is_enabled())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, RuleSetting)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (N, RuleSetting)>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for (name, setting) in iter {
            set.insert(name, setting);
        }
        set
    }
}
