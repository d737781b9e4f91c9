//! Derived test artifact generation.
//!
//! Each linted file gets a generated test that passes or fails with the
//! file's lint outcome, so lint results show up in the project's test run.

use std::fmt;
use std::sync::Arc;

/// Signature of a caller-supplied generator:
/// `(relative_path, passed, diagnostic_text) -> artifact source`.
pub type GeneratorFn = dyn Fn(&str, bool, &str) -> String + Send + Sync;

const SUITE_LABEL: &str = "TSGate";
const TOOL_NAME: &str = "tsgate";

/// Template used to render derived test artifacts.
#[derive(Clone, Default)]
pub enum TestGenerator {
    /// QUnit module with one `assert.ok` per file.
    #[default]
    QUnit,
    /// Mocha `describe`/`it` block using `chai.AssertionError`.
    Mocha,
    /// Fully custom rendering.
    Custom(Arc<GeneratorFn>),
}

impl TestGenerator {
    /// Selects a built-in template by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "qunit" => Some(Self::QUnit),
            "mocha" => Some(Self::Mocha),
            _ => None,
        }
    }

    /// Wraps a closure as a custom generator.
    pub fn custom<F>(generator: F) -> Self
    where
        F: Fn(&str, bool, &str) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(generator))
    }

    /// Template name; `custom` for caller-supplied generators.
    pub fn name(&self) -> &'static str {
        match self {
            Self::QUnit => "qunit",
            Self::Mocha => "mocha",
            Self::Custom(_) => "custom",
        }
    }

    /// Renders the artifact for one file.
    pub fn generate(&self, relative_path: &str, passed: bool, diagnostic_text: &str) -> String {
        match self {
            Self::QUnit => render_qunit(relative_path, passed, diagnostic_text),
            Self::Mocha => render_mocha(relative_path, passed, diagnostic_text),
            Self::Custom(generator) => generator(relative_path, passed, diagnostic_text),
        }
    }
}

impl fmt::Debug for TestGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestGenerator({})", self.name())
    }
}

/// Escapes text for a single-quoted JavaScript string literal.
pub fn escape_js_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn module_name(relative_path: &str) -> String {
    let dir = relative_path
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .filter(|dir| !dir.is_empty())
        .unwrap_or(".");
    escape_js_string(&format!("{} - {}", SUITE_LABEL, dir))
}

fn test_name(relative_path: &str) -> String {
    escape_js_string(&format!("{} should pass {}", relative_path, TOOL_NAME))
}

fn assertion_message(relative_path: &str, diagnostic_text: &str) -> String {
    let mut message = format!("{} should pass {}.", relative_path, TOOL_NAME);
    if !diagnostic_text.is_empty() {
        message.push_str("\n\n");
        message.push_str(diagnostic_text);
    }
    escape_js_string(&message)
}

fn render_qunit(relative_path: &str, passed: bool, diagnostic_text: &str) -> String {
    format!(
        "QUnit.module('{module}');\n\
         QUnit.test('{test}', function(assert) {{\n\
         \x20 assert.expect(1);\n\
         \x20 assert.ok({passed}, '{message}');\n\
         }});\n",
        module = module_name(relative_path),
        test = test_name(relative_path),
        passed = passed,
        message = assertion_message(relative_path, diagnostic_text),
    )
}

fn render_mocha(relative_path: &str, passed: bool, diagnostic_text: &str) -> String {
    let body = if passed {
        "    // test passed\n".to_string()
    } else {
        format!(
            "    // test failed\n\
             \x20   var error = new chai.AssertionError('{message}');\n\
             \x20   error.stack = undefined;\n\
             \x20   throw error;\n",
            message = assertion_message(relative_path, diagnostic_text),
        )
    };

    format!(
        "describe('{module}', function() {{\n\
         \x20 it('{test}', function() {{\n\
         {body}\
         \x20 }});\n\
         }});\n",
        module = module_name(relative_path),
        test = test_name(relative_path),
        body = body,
    )
}
