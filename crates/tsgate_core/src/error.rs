//! Stage error types.

use std::path::PathBuf;

use thiserror::Error;
use tsgate_engine::EngineError;

/// Errors that can occur while setting up or running a build.
///
/// Lint diagnostics are not errors; they are carried in
/// [`FileOutcome`](crate::FileOutcome) and the build report.
#[derive(Debug, Error)]
pub enum StageError {
    /// The rules document does not exist.
    #[error("Cannot find lint configuration file: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The rules document is not well-formed.
    #[error("Cannot parse configuration file {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// The rules document is well-formed but structurally invalid.
    #[error("Invalid configuration file {}: {message}", path.display())]
    ConfigShape { path: PathBuf, message: String },

    /// The lint engine faulted on a file.
    #[error("Lint engine failed on {path}: {source}")]
    LintEngine {
        path: String,
        #[source]
        source: EngineError,
    },

    /// Escalation: the build had lint errors and fail-build is enabled.
    #[error("Build failed due to lint errors!")]
    BuildFailed,

    /// A build was started while another one is running.
    #[error("A build is already in progress")]
    BuildInProgress,

    /// Invalid glob pattern.
    #[error("Invalid pattern: {0}")]
    Pattern(String),

    /// Outcome cache error.
    #[error("Cache error: {0}")]
    Cache(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StageError {
    /// Creates a parse error for a configuration file.
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a shape error for a configuration file.
    pub fn config_shape(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigShape {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors raised while loading configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigParse { .. } | Self::ConfigShape { .. }
        )
    }
}
