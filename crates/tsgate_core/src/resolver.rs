//! Path-sensitive configuration resolution.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::{ConfigLoader, DEFAULT_CONFIG_FILE, RulesConfiguration, StageError};

/// Finds the rules document that applies to a file below an input root.
///
/// The nearest `tslint.json` between the file's directory and the root wins.
/// Files with no document on that walk use the global configuration.
pub struct ConfigResolver {
    root: PathBuf,
    global: Arc<RulesConfiguration>,
    /// Per-directory lookups; `None` records a directory without a document.
    documents: Mutex<HashMap<PathBuf, Option<Arc<RulesConfiguration>>>>,
}

impl ConfigResolver {
    pub fn new(root: impl Into<PathBuf>, global: Arc<RulesConfiguration>) -> Self {
        Self {
            root: root.into(),
            global,
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configuration for a `/`-separated path relative to the root.
    pub fn resolve(&self, relative_path: &str) -> Result<Arc<RulesConfiguration>, StageError> {
        let path = Path::new(relative_path);
        if !path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            debug!(
                "Path {} is not a plain relative path, using global configuration",
                relative_path
            );
            return Ok(Arc::clone(&self.global));
        }

        let mut dir = path.parent();
        while let Some(current) = dir {
            if let Some(config) = self.lookup(&self.root.join(current))? {
                return Ok(config);
            }
            dir = current.parent();
        }

        Ok(Arc::clone(&self.global))
    }

    fn lookup(&self, dir: &Path) -> Result<Option<Arc<RulesConfiguration>>, StageError> {
        if let Some(cached) = self.documents.lock().get(dir) {
            return Ok(cached.clone());
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        let loaded = if candidate.is_file() {
            debug!("Using nested configuration {}", candidate.display());
            Some(Arc::new(ConfigLoader::load(&candidate)?))
        } else {
            None
        };

        self.documents
            .lock()
            .insert(dir.to_path_buf(), loaded.clone());
        Ok(loaded)
    }
}
