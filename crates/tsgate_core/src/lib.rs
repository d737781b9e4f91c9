//! # tsgate_core
//!
//! Incremental lint stage for a file-tree build pipeline.
//!
//! This crate provides:
//! - Rules document loading (`ConfigLoader`, `RulesConfiguration`)
//! - Per-file linting through a pluggable engine (`FileLinter`)
//! - Diagnostic formatting and generated test artifacts
//! - Build aggregation, reporting and escalation (`BuildAggregator`)
//! - Input tree discovery and an outcome cache
//!
//! ## Example
//!
//! ```rust,ignore
//! use tsgate_core::{BuildAggregator, SourceTree, StageOptions, write_artifacts};
//!
//! let options = StageOptions::new().configuration_path("tslint.json").fail_build(true);
//! let aggregator = BuildAggregator::from_options(options)?;
//!
//! let files = SourceTree::new("src", &["ts".to_string()], &[])?.collect()?;
//! let output = aggregator.run(&files)?;
//! write_artifacts("dist".as_ref(), &output.artifacts)?;
//! ```

pub mod build;
pub mod cache;
mod config;
mod diagnostic;
mod error;
pub mod formatter;
mod generator;
pub mod linter;
mod options;
pub mod resolver;
pub mod sink;
pub mod source_tree;
mod summary;

pub use build::{BuildAggregator, BuildOutput, BuildState, DerivedArtifact, derived_path};
pub use cache::OutcomeCache;
pub use config::{ConfigLoader, DEFAULT_CONFIG_FILE, RulesConfiguration};
pub use diagnostic::{Diagnostic, Severity};
pub use error::StageError;
pub use formatter::format_diagnostic;
pub use generator::{GeneratorFn, TestGenerator, escape_js_string};
pub use linter::{FileLinter, FileOutcome, FileProcessingStage};
pub use options::{DEFAULT_CACHE_DIR, DEFAULT_EXTENSION, StageOptions, TARGET_EXTENSION};
pub use sink::{LogNotifier, Notifier, ReportSink};
pub use source_tree::{SourceFile, SourceTree, write_artifacts};
pub use summary::BuildSummary;
