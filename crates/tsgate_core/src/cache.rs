//! Per-file outcome cache.
//!
//! An entry replays a stored [`FileOutcome`] when the file content, the
//! effective configuration and the artifact generator are all unchanged.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{FileOutcome, StageError};

const CACHE_FILE: &str = "outcomes.json";

/// A cached outcome for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// BLAKE3 hash of the file content.
    pub content_hash: String,
    /// Fingerprint of the configuration used.
    pub config_hash: String,
    /// Generator identity (`qunit`, `mocha` or `disabled`).
    pub generator: String,
    pub outcome: FileOutcome,
}

impl CacheEntry {
    pub fn new(
        content_hash: String,
        config_hash: String,
        generator: String,
        outcome: FileOutcome,
    ) -> Self {
        Self {
            content_hash,
            config_hash,
            generator,
            outcome,
        }
    }

    /// Checks whether this entry was produced from the same inputs.
    pub fn is_valid(&self, content_hash: &str, config_hash: &str, generator: &str) -> bool {
        self.content_hash == content_hash
            && self.config_hash == config_hash
            && self.generator == generator
    }
}

/// Stores lint outcomes keyed by relative path.
#[derive(Debug)]
pub struct OutcomeCache {
    cache_dir: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl OutcomeCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            entries: HashMap::new(),
        }
    }

    /// Computes the BLAKE3 hash of content.
    pub fn hash_content(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Returns the cached outcome when the entry matches the given inputs.
    pub fn get(
        &self,
        relative_path: &str,
        content_hash: &str,
        config_hash: &str,
        generator: &str,
    ) -> Option<&FileOutcome> {
        self.entries
            .get(relative_path)
            .filter(|entry| entry.is_valid(content_hash, config_hash, generator))
            .map(|entry| &entry.outcome)
    }

    /// Stores an entry, replacing any previous one for the path.
    pub fn set(&mut self, relative_path: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(relative_path.into(), entry);
    }

    /// Drops every entry whose path is not in `live`.
    pub fn retain_paths(&mut self, live: &HashSet<String>) {
        let before = self.entries.len();
        self.entries.retain(|path, _| live.contains(path));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!("Dropped {} stale cache entries", dropped);
        }
    }

    /// Loads entries from disk. A missing cache file is not an error.
    pub fn load(&mut self) -> Result<(), StageError> {
        let cache_file = self.cache_dir.join(CACHE_FILE);
        if !cache_file.exists() {
            debug!("No cache file found at {}", cache_file.display());
            return Ok(());
        }

        let content = fs::read_to_string(&cache_file)?;
        let entries: HashMap<String, CacheEntry> = serde_json::from_str(&content)
            .map_err(|e| StageError::Cache(format!("corrupted cache file: {}", e)))?;

        info!("Loaded {} cache entries", entries.len());
        self.entries = entries;
        Ok(())
    }

    /// Saves entries to disk.
    pub fn save(&self) -> Result<(), StageError> {
        fs::create_dir_all(&self.cache_dir)?;
        let cache_file = self.cache_dir.join(CACHE_FILE);
        let json = serde_json::to_string(&self.entries)
            .map_err(|e| StageError::Cache(e.to_string()))?;
        fs::write(&cache_file, json)?;

        debug!(
            "Saved {} cache entries to {}",
            self.entries.len(),
            cache_file.display()
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
