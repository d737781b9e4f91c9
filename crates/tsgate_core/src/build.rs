//! Build-cycle aggregation.
//!
//! A build runs every input through a [`FileProcessingStage`] in parallel,
//! folds the outcomes in input order into a fresh [`BuildSummary`], then
//! finalizes: the summary line goes to the notifier when there are failures,
//! the report goes to exactly one [`ReportSink`], and lint errors escalate
//! to [`StageError::BuildFailed`] when `fail_build` is set.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use tsgate_engine::BuiltinEngine;

use crate::cache::OutcomeCache;
use crate::linter::{FileLinter, FileOutcome, FileProcessingStage};
use crate::options::TARGET_EXTENSION;
use crate::{
    BuildSummary, ConfigLoader, LogNotifier, Notifier, ReportSink, SourceFile, StageError,
    StageOptions,
};

/// Lifecycle of the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Running,
}

/// A derived output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedArtifact {
    /// Output path relative to the output root, `/`-separated.
    pub path: String,
    pub text: String,
}

/// Everything a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// One artifact per input, in input order.
    pub artifacts: Vec<DerivedArtifact>,
    pub summary: BuildSummary,
    /// Report text delivered to the sink.
    pub report: String,
}

/// Maps an input path to its derived artifact path by replacing the
/// extension: `app/a.ts` becomes `app/a.lint-test.js`.
pub fn derived_path(relative_path: &str, target_extension: &str) -> String {
    Path::new(relative_path)
        .with_extension(target_extension)
        .to_string_lossy()
        .into_owned()
}

/// Runs builds and owns the per-build lifecycle.
pub struct BuildAggregator {
    stage: Arc<dyn FileProcessingStage>,
    sink: ReportSink,
    notifier: Arc<dyn Notifier>,
    fail_build: bool,
    target_extension: String,
    state: Mutex<BuildState>,
}

/// Returns the aggregator to `Idle` when a build ends, on every path.
struct RunningGuard<'a>(&'a Mutex<BuildState>);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock() = BuildState::Idle;
    }
}

impl BuildAggregator {
    /// Creates an aggregator around an existing stage.
    pub fn new(stage: Arc<dyn FileProcessingStage>, options: &StageOptions) -> Self {
        let notifier = match &options.notifier {
            Some(notifier) => Arc::clone(notifier),
            None => Arc::new(LogNotifier),
        };

        Self {
            stage,
            sink: ReportSink::from_output_file(options.output_file.as_deref()),
            notifier,
            fail_build: options.fail_build,
            target_extension: TARGET_EXTENSION.to_string(),
            state: Mutex::new(BuildState::Idle),
        }
    }

    /// Loads the rules document and builds a [`FileLinter`] over the
    /// built-in engine. Configuration errors are returned before any build.
    pub fn from_options(options: StageOptions) -> Result<Self, StageError> {
        let config = match &options.configuration_path {
            Some(path) => ConfigLoader::load(ConfigLoader::resolve_path(Some(path.as_path()))?)?,
            None => ConfigLoader::load_default()?,
        };
        debug!(
            "Loaded {} rules from {}",
            config.rules().len(),
            config.source_path().display()
        );

        let generator = (!options.disable_test_generator).then(|| options.test_generator.clone());
        let mut linter = FileLinter::new(Arc::new(BuiltinEngine::new()), Arc::new(config))
            .with_generator(generator);

        if let Some(root) = &options.nested_config_root {
            linter = linter.with_nested_configs(root);
        }

        if let Some(dir) = &options.cache_dir {
            let mut cache = OutcomeCache::new(dir);
            if let Err(e) = cache.load() {
                warn!("Ignoring unreadable outcome cache: {}", e);
            }
            linter = linter.with_cache(cache);
        }

        Ok(Self::new(Arc::new(linter), &options))
    }

    pub fn state(&self) -> BuildState {
        *self.state.lock()
    }

    /// Runs one build over `files`.
    ///
    /// Outcomes are folded in input order. On an engine fault the outcomes
    /// folded so far are still finalized and reported before the fault is
    /// returned.
    pub fn run(&self, files: &[SourceFile]) -> Result<BuildOutput, StageError> {
        let _guard = self.begin()?;

        let results: Vec<Result<FileOutcome, StageError>> = files
            .par_iter()
            .map(|file| self.stage.process(&file.relative_path, &file.content))
            .collect();

        let mut summary = BuildSummary::new();
        let mut artifacts = Vec::with_capacity(files.len());
        let mut fault = None;

        for result in results {
            match result {
                Ok(outcome) => {
                    for line in summary.record(&outcome) {
                        self.notifier.notify(line);
                    }
                    artifacts.push(DerivedArtifact {
                        path: derived_path(&outcome.relative_path, &self.target_extension),
                        text: outcome.artifact_text,
                    });
                }
                Err(e) => {
                    fault = Some(e);
                    break;
                }
            }
        }

        if let Err(e) = self.stage.finish_build() {
            warn!("Failed to finish build: {}", e);
        }

        let report = self.finalize(&summary)?;

        if let Some(e) = fault {
            return Err(e);
        }
        if self.fail_build && summary.has_failures() {
            return Err(StageError::BuildFailed);
        }

        Ok(BuildOutput {
            artifacts,
            summary,
            report,
        })
    }

    fn begin(&self) -> Result<RunningGuard<'_>, StageError> {
        let mut state = self.state.lock();
        if *state == BuildState::Running {
            return Err(StageError::BuildInProgress);
        }
        *state = BuildState::Running;
        Ok(RunningGuard(&self.state))
    }

    fn finalize(&self, summary: &BuildSummary) -> Result<String, StageError> {
        if summary.has_failures() {
            self.notifier.notify(&summary.summary_line());
        }

        let report = summary.report();
        self.sink.deliver(&report)?;
        info!(
            "Linted {} files, {} errors",
            summary.total_files, summary.failure_count
        );
        Ok(report)
    }
}
