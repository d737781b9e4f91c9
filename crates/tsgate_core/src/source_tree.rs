//! Input tree discovery and artifact output.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{DerivedArtifact, StageError};

/// A tracked input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the input root, `/`-separated.
    pub relative_path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }
}

/// Tracked files below an input root.
pub struct SourceTree {
    root: PathBuf,
    extensions: Vec<String>,
    exclude_globs: Option<GlobSet>,
}

impl SourceTree {
    pub fn new(
        root: impl Into<PathBuf>,
        extensions: &[String],
        exclude: &[String],
    ) -> Result<Self, StageError> {
        Ok(Self {
            root: root.into(),
            extensions: extensions.to_vec(),
            exclude_globs: Self::build_globset(exclude)?,
        })
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, StageError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                StageError::Pattern(format!("Invalid pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| StageError::Pattern(format!("Failed to build globset: {}", e)))?;
        Ok(Some(globset))
    }

    fn is_tracked(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|tracked| tracked == ext))
    }

    fn is_excluded(&self, relative_path: &str) -> bool {
        self.exclude_globs
            .as_ref()
            .is_some_and(|excludes| excludes.is_match(relative_path))
    }

    /// Reads every tracked file, sorted by relative path. Files that are not
    /// valid UTF-8 are skipped with a warning.
    pub fn collect(&self) -> Result<Vec<SourceFile>, StageError> {
        if !self.root.is_dir() {
            return Err(StageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input directory not found: {}", self.root.display()),
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_tracked(path) {
                continue;
            }

            let Some(relative_path) = relative_slash_path(&self.root, path) else {
                continue;
            };
            if self.is_excluded(&relative_path) {
                debug!("Excluded {}", relative_path);
                continue;
            }

            let content = match String::from_utf8(fs::read(path)?) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping {}: not valid UTF-8 ({})", relative_path, e.utf8_error());
                    continue;
                }
            };
            files.push(SourceFile::new(relative_path, content));
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        info!("Discovered {} files to lint", files.len());
        Ok(files)
    }
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.iter().map(|part| part.to_str()).collect();
    Some(parts?.join("/"))
}

/// Writes derived artifacts below `output_root`, creating directories.
pub fn write_artifacts(output_root: &Path, artifacts: &[DerivedArtifact]) -> Result<(), StageError> {
    for artifact in artifacts {
        let target = output_root.join(&artifact.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &artifact.text)?;
    }
    debug!(
        "Wrote {} artifacts to {}",
        artifacts.len(),
        output_root.display()
    );
    Ok(())
}
