//! Per-file lint invocation.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tsgate_engine::LintEngine;

use crate::cache::{CacheEntry, OutcomeCache};
use crate::formatter::{diagnostic_text, format_diagnostics};
use crate::resolver::ConfigResolver;
use crate::{Diagnostic, RulesConfiguration, StageError, TestGenerator};

/// Generator identity recorded in cache entries when generation is off.
const GENERATOR_DISABLED: &str = "disabled";

/// Per-file unit of work run by the build aggregator.
pub trait FileProcessingStage: Send + Sync {
    /// Processes one file. Lint diagnostics are data; `Err` is a fault.
    fn process(&self, relative_path: &str, content: &str) -> Result<FileOutcome, StageError>;

    /// Called once after every file of a build has been processed.
    fn finish_build(&self) -> Result<(), StageError> {
        Ok(())
    }
}

/// Result of linting a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub relative_path: String,
    /// True when the file has no error-severity diagnostics.
    pub passed: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Derived artifact source; empty when generation is disabled.
    pub artifact_text: String,
}

impl FileOutcome {
    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Diagnostics formatted for the report, in emission order.
    pub fn formatted_lines(&self) -> Vec<String> {
        format_diagnostics(&self.diagnostics)
    }
}

/// Lints files with a [`LintEngine`] and renders their derived artifacts.
pub struct FileLinter {
    engine: Arc<dyn LintEngine>,
    global: Arc<RulesConfiguration>,
    resolver: Option<ConfigResolver>,
    /// `None` when test generation is disabled.
    generator: Option<TestGenerator>,
    cache: Option<Mutex<OutcomeCache>>,
    /// Paths processed in the current build; the cache keeps only these.
    seen_paths: Mutex<HashSet<String>>,
    warned_rules: Mutex<HashSet<String>>,
}

impl FileLinter {
    pub fn new(engine: Arc<dyn LintEngine>, config: Arc<RulesConfiguration>) -> Self {
        Self {
            engine,
            global: config,
            resolver: None,
            generator: Some(TestGenerator::default()),
            cache: None,
            seen_paths: Mutex::new(HashSet::new()),
            warned_rules: Mutex::new(HashSet::new()),
        }
    }

    /// Sets the artifact template. `None` disables generation.
    pub fn with_generator(mut self, generator: Option<TestGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Resolves nested `tslint.json` documents below `root`.
    pub fn with_nested_configs(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.resolver = Some(ConfigResolver::new(root, Arc::clone(&self.global)));
        self
    }

    /// Replays unchanged files from `cache`.
    pub fn with_cache(mut self, cache: OutcomeCache) -> Self {
        self.cache = Some(Mutex::new(cache));
        self
    }

    /// Lints `content` against an explicit configuration.
    pub fn lint(
        &self,
        relative_path: &str,
        content: &str,
        config: &RulesConfiguration,
    ) -> Result<FileOutcome, StageError> {
        self.warn_unknown_rules(config);

        let failures = self
            .engine
            .lint(relative_path, content, config.rules())
            .map_err(|source| StageError::LintEngine {
                path: relative_path.to_string(),
                source,
            })?;

        let diagnostics: Vec<Diagnostic> = failures
            .into_iter()
            .map(|failure| Diagnostic::from_failure(relative_path, failure))
            .collect();
        let passed = !diagnostics.iter().any(Diagnostic::is_error);

        let artifact_text = match &self.generator {
            Some(generator) => {
                let lines = format_diagnostics(&diagnostics);
                generator.generate(relative_path, passed, &diagnostic_text(&lines))
            }
            None => String::new(),
        };

        debug!(
            "Linted {}: {} diagnostics, passed = {}",
            relative_path,
            diagnostics.len(),
            passed
        );

        Ok(FileOutcome {
            relative_path: relative_path.to_string(),
            passed,
            diagnostics,
            artifact_text,
        })
    }

    fn config_for(&self, relative_path: &str) -> Result<Arc<RulesConfiguration>, StageError> {
        match &self.resolver {
            Some(resolver) => resolver.resolve(relative_path),
            None => Ok(Arc::clone(&self.global)),
        }
    }

    /// Cache identity of the generator. Custom generators are opaque and
    /// never cached.
    fn generator_key(&self) -> Option<&'static str> {
        match &self.generator {
            None => Some(GENERATOR_DISABLED),
            Some(TestGenerator::Custom(_)) => None,
            Some(generator) => Some(generator.name()),
        }
    }

    fn warn_unknown_rules(&self, config: &RulesConfiguration) {
        for (name, _) in config.rules().enabled() {
            if self.engine.supports_rule(name) {
                continue;
            }
            if self.warned_rules.lock().insert(name.to_string()) {
                warn!(
                    "Rule '{}' in {} is not known to the lint engine and will be skipped",
                    name,
                    config.source_path().display()
                );
            }
        }
    }
}

impl FileProcessingStage for FileLinter {
    fn process(&self, relative_path: &str, content: &str) -> Result<FileOutcome, StageError> {
        let config = self.config_for(relative_path)?;

        if self.cache.is_some() {
            self.seen_paths.lock().insert(relative_path.to_string());
        }

        let (Some(cache), Some(generator)) = (&self.cache, self.generator_key()) else {
            return self.lint(relative_path, content, &config);
        };

        let content_hash = OutcomeCache::hash_content(content);
        if let Some(outcome) =
            cache
                .lock()
                .get(relative_path, &content_hash, config.fingerprint(), generator)
        {
            debug!("Using cached outcome for {}", relative_path);
            return Ok(outcome.clone());
        }

        let outcome = self.lint(relative_path, content, &config)?;
        cache.lock().set(
            relative_path,
            CacheEntry::new(
                content_hash,
                config.fingerprint().to_string(),
                generator.to_string(),
                outcome.clone(),
            ),
        );
        Ok(outcome)
    }

    fn finish_build(&self) -> Result<(), StageError> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };

        let seen = std::mem::take(&mut *self.seen_paths.lock());
        let mut cache = cache.lock();
        cache.retain_paths(&seen);
        cache.save()
    }
}
