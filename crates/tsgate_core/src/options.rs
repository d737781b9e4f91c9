//! Options for constructing a lint stage.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{Notifier, TestGenerator};

/// Extension of tracked input files.
pub const DEFAULT_EXTENSION: &str = "ts";

/// Extension that replaces the input extension on derived artifacts.
pub const TARGET_EXTENSION: &str = "lint-test.js";

/// Default directory for the outcome cache.
pub const DEFAULT_CACHE_DIR: &str = ".tsgate-cache";

/// Configuration surface of the lint stage.
#[derive(Clone)]
pub struct StageOptions {
    /// Rules document override. Default: `tslint.json` in the working directory.
    pub configuration_path: Option<PathBuf>,
    /// Report file. When unset the report goes to the console.
    pub output_file: Option<PathBuf>,
    /// Raise `BuildFailed` when a build has lint errors.
    pub fail_build: bool,
    /// Emit empty derived artifacts instead of generated tests.
    pub disable_test_generator: bool,
    /// Template for derived artifacts.
    pub test_generator: TestGenerator,
    /// Receives each formatted diagnostic line and the failure summary line.
    pub notifier: Option<Arc<dyn Notifier>>,
    /// Input tree root used for nested `tslint.json` resolution.
    /// `None` disables path-sensitive resolution.
    pub nested_config_root: Option<PathBuf>,
    /// Directory for the outcome cache. `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Tracked input extensions, without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            configuration_path: None,
            output_file: None,
            fail_build: false,
            disable_test_generator: false,
            test_generator: TestGenerator::default(),
            notifier: None,
            nested_config_root: None,
            cache_dir: None,
            extensions: vec![DEFAULT_EXTENSION.to_string()],
        }
    }
}

impl StageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rules document path.
    pub fn configuration_path(mut self, path: impl AsRef<Path>) -> Self {
        self.configuration_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the report file.
    pub fn output_file(mut self, path: impl AsRef<Path>) -> Self {
        self.output_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables or disables escalation of lint errors.
    pub fn fail_build(mut self, yes: bool) -> Self {
        self.fail_build = yes;
        self
    }

    /// Enables or disables derived test generation.
    pub fn disable_test_generator(mut self, yes: bool) -> Self {
        self.disable_test_generator = yes;
        self
    }

    /// Sets the derived test template.
    pub fn test_generator(mut self, generator: TestGenerator) -> Self {
        self.test_generator = generator;
        self
    }

    /// Sets the line notifier.
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Enables nested `tslint.json` resolution below `root`.
    pub fn nested_configs(mut self, root: impl AsRef<Path>) -> Self {
        self.nested_config_root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Enables the outcome cache in `dir`.
    pub fn cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Replaces the tracked extensions.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for StageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageOptions")
            .field("configuration_path", &self.configuration_path)
            .field("output_file", &self.output_file)
            .field("fail_build", &self.fail_build)
            .field("disable_test_generator", &self.disable_test_generator)
            .field("test_generator", &self.test_generator)
            .field("notifier", &self.notifier.is_some())
            .field("nested_config_root", &self.nested_config_root)
            .field("cache_dir", &self.cache_dir)
            .field("extensions", &self.extensions)
            .finish()
    }
}
