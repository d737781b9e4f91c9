//! # tsgate_engine
//!
//! Lint engine used by the tsgate build stage.
//!
//! This crate provides:
//! - The engine-native failure model (`RuleFailure`, `Position`, `RuleSeverity`)
//! - Rule settings as they appear in a rules document (`RuleSetting`, `RuleSet`)
//! - The `LintEngine` trait the build stage depends on
//! - `BuiltinEngine`, a small set of line-oriented rules
//!
//! ## Example
//!
//! ```rust,ignore
//! use tsgate_engine::{BuiltinEngine, LintEngine, RuleSet, RuleSetting};
//!
//! let mut rules = RuleSet::new();
//! rules.insert("eofline", RuleSetting::Enabled(true));
//!
//! let failures = BuiltinEngine::new().lint("a.ts", "let x = 1;", &rules)?;
//! assert_eq!(failures[0].failure, "file should end with a newline");
//! ```

mod engine;
mod error;
mod failure;
mod mask;
pub mod presets;
pub mod rules;
mod setting;

pub use engine::{BuiltinEngine, LintEngine};
pub use error::EngineError;
pub use failure::{Position, RuleFailure, RuleSeverity};
pub use setting::{Level, RuleSet, RuleSetting, RuleSettingDetail};
