//! Bidirectional mapping between a real source root and a virtual target root.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::path;

/// Converts paths between one real source root and one virtual target root.
///
/// Both directions are pure prefix substitutions. Converting a path that is
/// not under the expected root fails with [`Error::PathNotUnderRoot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConverter {
    source_root: PathBuf,
    target_root: String,
}

impl PathConverter {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<String>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &str {
        &self.target_root
    }

    /// Map a real path under the source root to its virtual path.
    pub fn source_to_target(&self, source: &Path) -> Result<String> {
        let relative = source
            .strip_prefix(&self.source_root)
            .map_err(|_| Error::PathNotUnderRoot {
                path: source.display().to_string(),
                root: self.source_root.display().to_string(),
            })?;

        let mut target = self.target_root.clone();
        for component in relative.components() {
            target.push(path::SEPARATOR);
            target.push_str(&component.as_os_str().to_string_lossy());
        }
        Ok(path::clean(&target))
    }

    /// Map a virtual path under the target root back to its real path.
    pub fn target_to_source(&self, target: &str) -> Result<PathBuf> {
        let relative =
            path::strip_root(target, &self.target_root).ok_or_else(|| Error::PathNotUnderRoot {
                path: target.to_string(),
                root: self.target_root.clone(),
            })?;

        let mut source = self.source_root.clone();
        for segment in relative.split(path::SEPARATOR).filter(|s| !s.is_empty()) {
            source.push(segment);
        }
        Ok(source)
    }
}
