//! Rules document loading.
//!
//! A rules document is JSON (comments and trailing commas allowed) with a
//! required `rules` object and an optional `extends` entry:
//!
//! ```json
//! {
//!   "extends": "tsgate:recommended",
//!   "rules": {
//!     "max-line-length": [true, 100],
//!     "no-debugger": "warning"
//!   }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde_json::{Map, Value};
use tracing::{debug, info};
use tsgate_engine::presets::{self, PRESET_PREFIX};
use tsgate_engine::{RuleSet, RuleSetting};

use crate::StageError;

/// Conventional name of the rules document.
pub const DEFAULT_CONFIG_FILE: &str = "tslint.json";

const FORMAT_HINT: &str = "The format of the config file is { rules: { /* rules list */ } }, \
     where /* rules list */ is a key: value comma-separated list of rulename: rule-options pairs.";

/// A validated rules document.
///
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RulesConfiguration {
    source_path: PathBuf,
    rules: RuleSet,
    fingerprint: String,
}

impl RulesConfiguration {
    /// Path of the document this configuration was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Effective rules, extended presets merged in.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Stable hash of the effective rules.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn from_rules(source_path: PathBuf, merged: Map<String, Value>) -> Result<Self, StageError> {
        let fingerprint = blake3::hash(Value::Object(merged.clone()).to_string().as_bytes())
            .to_hex()
            .to_string();

        let mut rules = RuleSet::new();
        for (name, value) in merged {
            let setting: RuleSetting = serde_json::from_value(value).map_err(|e| {
                StageError::config_shape(
                    &source_path,
                    format!("Invalid setting for rule '{}': {}", name, e),
                )
            })?;
            setting.validate().map_err(|reason| {
                StageError::config_shape(
                    &source_path,
                    format!("Invalid setting for rule '{}': {}", name, reason),
                )
            })?;
            rules.insert(name, setting);
        }

        Ok(Self {
            source_path,
            rules,
            fingerprint,
        })
    }
}

/// Locates, reads and validates rules documents.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<RulesConfiguration, StageError> {
        let path = path.as_ref();
        let mut chain = Vec::new();
        let merged = Self::load_rules(path, true, &mut chain)?;

        if merged.is_empty() {
            info!("No rules defined for linting in {}", path.display());
        }

        RulesConfiguration::from_rules(path.to_path_buf(), merged)
    }

    /// Loads `tslint.json` from the working directory.
    pub fn load_default() -> Result<RulesConfiguration, StageError> {
        info!(
            "Using {} as the default file for linting rules",
            DEFAULT_CONFIG_FILE
        );
        Self::load(Self::resolve_path(None)?)
    }

    /// Returns the document path for an optional override, resolved against
    /// the working directory.
    pub fn resolve_path(configured: Option<&Path>) -> Result<PathBuf, StageError> {
        let cwd = std::env::current_dir()?;
        Ok(match configured {
            Some(path) => cwd.join(path),
            None => cwd.join(DEFAULT_CONFIG_FILE),
        })
    }

    fn load_rules(
        path: &Path,
        require_rules: bool,
        chain: &mut Vec<PathBuf>,
    ) -> Result<Map<String, Value>, StageError> {
        if !path.is_file() {
            return Err(StageError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let identity = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if chain.contains(&identity) {
            return Err(StageError::config_shape(
                path,
                "Circular 'extends' chain detected",
            ));
        }

        debug!("Reading rules document {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| StageError::config_parse(path, format!("Failed to read: {}", e)))?;

        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
            .map_err(|e| StageError::config_parse(path, e.to_string()))?
            .ok_or_else(|| StageError::config_parse(path, "Document is empty"))?;

        let Value::Object(mut document) = value else {
            return Err(StageError::config_shape(path, FORMAT_HINT));
        };

        let local_rules = match document.remove("rules") {
            Some(Value::Object(rules)) => rules,
            Some(_) => return Err(StageError::config_shape(path, "'rules' must be an object")),
            None if require_rules => return Err(StageError::config_shape(path, FORMAT_HINT)),
            None => Map::new(),
        };

        let mut merged = Map::new();
        chain.push(identity);
        for reference in Self::extends_entries(path, document.get("extends"))? {
            let base = if let Some(preset) = presets::resolve(&reference) {
                preset
            } else if reference.starts_with(PRESET_PREFIX) {
                return Err(StageError::config_shape(
                    path,
                    format!("Unknown preset '{}'", reference),
                ));
            } else {
                let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
                Self::load_rules(&base_dir.join(&reference), false, chain)?
            };
            merged.extend(base);
        }
        chain.pop();

        merged.extend(local_rules);
        Ok(merged)
    }

    fn extends_entries(path: &Path, extends: Option<&Value>) -> Result<Vec<String>, StageError> {
        match extends {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(reference)) => Ok(vec![reference.clone()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        StageError::config_shape(path, "'extends' entries must be strings")
                    })
                })
                .collect(),
            Some(_) => Err(StageError::config_shape(
                path,
                "'extends' must be a string or a list of strings",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_rules() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "tslint.json",
            r#"{ "rules": { "eofline": true, "max-line-length": [true, 80] } }"#,
        );

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.rules().len(), 2);
        assert_eq!(config.source_path(), path.as_path());
        let names: Vec<_> = config.rules().iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["eofline", "max-line-length"]);
    }

    #[test]
    fn test_load_allows_comments() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "tslint.json",
            "{\n  // whitespace only\n  \"rules\": { \"eofline\": true, },\n}",
        );

        assert_eq!(ConfigLoader::load(&path).unwrap().rules().len(), 1);
    }

    #[test]
    fn test_load_with_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "tslint.json",
            "\u{feff}{ \"rules\": { \"eofline\": true } }",
        );

        assert_eq!(ConfigLoader::load(&path).unwrap().rules().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::load(dir.path().join("foo.json")).unwrap_err();
        assert!(matches!(err, StageError::ConfigNotFound { .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_load_empty_rules_is_allowed() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "tslint.json", r#"{ "rules": {} }"#);

        let config = ConfigLoader::load(&path).unwrap();
        assert!(config.rules().is_empty());
    }

    #[rstest]
    #[case::not_json("{ rules: ")]
    #[case::empty_document("")]
    fn test_load_parse_errors(#[case] content: &str) {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "tslint.json", content);

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, StageError::ConfigParse { .. }), "got {:?}", err);
    }

    #[rstest]
    #[case::missing_rules(r#"{ "extends": "tsgate:recommended" }"#, "format of the config file")]
    #[case::rules_not_object(r#"{ "rules": [] }"#, "'rules' must be an object")]
    #[case::top_level_array(r#"[1, 2]"#, "format of the config file")]
    #[case::bad_setting(r#"{ "rules": { "eofline": { "level": 1 } } }"#, "Invalid setting for rule 'eofline'")]
    #[case::array_without_flag(r#"{ "rules": { "max-line-length": [80] } }"#, "boolean enable flag")]
    #[case::unknown_preset(r#"{ "extends": "tsgate:nope", "rules": {} }"#, "Unknown preset")]
    #[case::bad_extends(r#"{ "extends": 3, "rules": {} }"#, "'extends' must be")]
    fn test_load_shape_errors(#[case] content: &str, #[case] expected: &str) {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "tslint.json", content);

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, StageError::ConfigShape { .. }), "got {:?}", err);
        assert!(
            err.to_string().contains(expected),
            "'{}' should contain '{}'",
            err,
            expected
        );
    }

    #[test]
    fn test_extends_preset_with_local_override() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "tslint.json",
            r#"{ "extends": "tsgate:recommended", "rules": { "no-var-keyword": false, "custom": true } }"#,
        );

        let config = ConfigLoader::load(&path).unwrap();
        let rules = config.rules();
        assert_eq!(rules.get("no-var-keyword"), Some(&RuleSetting::Enabled(false)));
        assert!(rules.get("eofline").is_some());
        let names: Vec<_> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names.first(), Some(&"no-trailing-whitespace"));
        assert_eq!(names.last(), Some(&"custom"));
    }

    #[test]
    fn test_extends_relative_file() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "base.json", r#"{ "rules": { "eofline": true } }"#);
        let path = write_config(
            &dir,
            "tslint.json",
            r#"{ "extends": ["./base.json"], "rules": { "no-debugger": true } }"#,
        );

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.rules().len(), 2);
    }

    #[test]
    fn test_extends_base_without_rules() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "base.json", r#"{ "extends": "tsgate:whitespace" }"#);
        let path = write_config(
            &dir,
            "tslint.json",
            r#"{ "extends": "./base.json", "rules": {} }"#,
        );

        assert_eq!(ConfigLoader::load(&path).unwrap().rules().len(), 3);
    }

    #[test]
    fn test_extends_cycle() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "a.json", r#"{ "extends": "./b.json", "rules": {} }"#);
        write_config(&dir, "b.json", r#"{ "extends": "./a.json", "rules": {} }"#);

        let err = ConfigLoader::load(dir.path().join("a.json")).unwrap_err();
        assert!(err.to_string().contains("Circular"));
    }

    #[test]
    fn test_extends_missing_base() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "tslint.json", r#"{ "extends": "./gone.json", "rules": {} }"#);

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, StageError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_fingerprint_tracks_effective_rules() {
        let dir = TempDir::new().unwrap();
        let a = write_config(&dir, "a.json", r#"{ "rules": { "eofline": true } }"#);
        let b = write_config(&dir, "b.json", "{\n  \"rules\": {\"eofline\": true}\n}");
        let c = write_config(&dir, "c.json", r#"{ "rules": { "eofline": false } }"#);

        let fa = ConfigLoader::load(&a).unwrap();
        let fb = ConfigLoader::load(&b).unwrap();
        let fc = ConfigLoader::load(&c).unwrap();
        assert_eq!(fa.fingerprint(), fb.fingerprint());
        assert_ne!(fa.fingerprint(), fc.fingerprint());
    }
}
