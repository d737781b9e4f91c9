//! Named rule presets that a rules document can extend.

use serde_json::{Map, Value, json};

/// Prefix marking an `extends` entry as a built-in preset.
pub const PRESET_PREFIX: &str = "tsgate:";

/// Names of the built-in presets.
pub const PRESET_NAMES: &[&str] = &["recommended", "whitespace"];

/// Returns the rules of a preset named `tsgate:<name>`, or `None` if
/// `reference` does not name a built-in preset.
pub fn resolve(reference: &str) -> Option<Map<String, Value>> {
    let name = reference.strip_prefix(PRESET_PREFIX)?;
    let rules = match name {
        "recommended" => json!({
            "no-trailing-whitespace": true,
            "eofline": true,
            "no-consecutive-blank-lines": true,
            "no-var-keyword": true,
            "no-debugger": true,
            "max-line-length": [true, 120]
        }),
        "whitespace" => json!({
            "no-trailing-whitespace": true,
            "eofline": true,
            "no-consecutive-blank-lines": true
        }),
        _ => return None,
    };

    match rules {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
