//! The ordered stack of mounts presenting one virtual namespace.

use std::sync::Arc;

use log::debug;

use super::mount::{Mount, Shadow};
use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::path;

/// An ordered stack of mounts.
///
/// Mounts are held in precedence order: the mount declared first is consulted
/// first and wins every conflict. Precedence and shadowing are evaluated per
/// query, because each glob pattern can touch a different set of mounts.
#[derive(Debug, Clone)]
pub struct MountSet {
    fs: Arc<dyn FileSystem>,
    mounts: Vec<Mount>,
}

impl MountSet {
    /// Build every mount in declaration order. The first failure aborts.
    pub fn new<S: AsRef<str>>(fs: Arc<dyn FileSystem>, specs: &[S]) -> Result<Self> {
        let mounts = specs
            .iter()
            .map(|spec| Mount::new(fs.as_ref(), spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        debug!("Built mount set with {} mounts", mounts.len());
        Ok(Self { fs, mounts })
    }

    /// The filesystem the mounts read from.
    pub fn filesystem(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Mounts in precedence order, highest first.
    pub fn iter(&self) -> impl Iterator<Item = &Mount> {
        self.mounts.iter()
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Virtual directories matching `pattern` across all mounts.
    ///
    /// With more than one mount the result is sorted and a directory exposed
    /// by several mounts is reported once.
    pub fn directories(&self, pattern: &str) -> Result<Vec<String>> {
        self.collect(pattern, Mount::dirs)
    }

    /// Virtual files matching `pattern` across all mounts, sorted and
    /// deduplicated like [`MountSet::directories`].
    pub fn files(&self, pattern: &str) -> Result<Vec<String>> {
        self.collect(pattern, Mount::files)
    }

    fn collect(
        &self,
        pattern: &str,
        list: impl Fn(&Mount, &glob::Pattern, &mut Vec<String>, &[Shadow]),
    ) -> Result<Vec<String>> {
        let pattern = path::compile_glob(pattern)?;

        let mut matches = Vec::new();
        let mut shadows = Vec::with_capacity(self.mounts.len());
        for mount in &self.mounts {
            list(mount, &pattern, &mut matches, &shadows);
            shadows.push(mount.shadow());
        }

        // Contributions from several mounts arrive unordered, and mounts
        // sharing a root directory each report it.
        if self.mounts.len() > 1 {
            matches.sort();
            matches.dedup();
        }

        Ok(matches)
    }

    /// Returns true if any mount exposes the virtual file `target`.
    pub fn contains_file(&self, target: &str) -> bool {
        self.mounts.iter().any(|mount| mount.contains_file(target))
    }

    /// Read a virtual file from the highest-precedence mount exposing it.
    pub fn read_file(&self, target: &str) -> Result<Vec<u8>> {
        for mount in &self.mounts {
            if mount.contains_file(target) {
                return mount.read(self.fs.as_ref(), target);
            }
        }

        Err(Error::NotFound {
            path: target.to_string(),
        })
    }

    /// Read a virtual file as UTF-8 text.
    pub fn read_to_string(&self, target: &str) -> Result<String> {
        let bytes = self.read_file(target)?;
        String::from_utf8(bytes).map_err(|e| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{}: {}", target, e),
            ))
        })
    }
}
