//! A single source→target binding in the overlay.
//!
//! A mount is parsed from a spec string of the form `source:target`. The
//! source is a real file or directory; the target is an absolute virtual
//! path. Every file and directory the mount exposes is enumerated once, at
//! construction, and kept sorted so membership checks are binary searches.
//!
//! Trailing separators carry meaning:
//!
//! - `dir/:/target` requires the source to be a directory; a file source is
//!   rejected with [`Error::MountInvalid`].
//! - `file:/target/` mounts the file as a child of `/target` under its own
//!   base name (`/target/file`), while `file:/target` mounts it exactly at
//!   `/target`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use glob::Pattern;
use log::debug;

use super::converter::PathConverter;
use crate::error::{Error, Result};
use crate::filesystem::{EntryKind, FileSystem};
use crate::path;

/// A parsed, not yet resolved, `source:target` mount spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub source: String,
    pub target: String,
    /// The source ended with a separator: it must be a directory.
    pub source_trailing_separator: bool,
    /// The target ended with a separator: mount the source under it.
    pub target_trailing_separator: bool,
}

impl MountSpec {
    /// Parse a `source:target` spec string.
    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
            return Err(Error::MountInvalid {
                message: format!("format must be 'source:target': {}", spec),
            });
        }

        Ok(Self {
            source: parts[0].to_string(),
            target: parts[1].to_string(),
            source_trailing_separator: path::has_trailing_separator(parts[0]),
            target_trailing_separator: path::has_trailing_separator(parts[1]),
        })
    }
}

impl FromStr for MountSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}

/// The part of the namespace a mount hides from lower-precedence mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shadow {
    /// Everything strictly below a directory mount's target root.
    Subtree(String),
    /// Exactly a file mount's target path.
    Exact(String),
}

impl Shadow {
    /// Returns true if `path` is hidden by this shadow.
    pub fn covers(&self, candidate: &str) -> bool {
        match self {
            Shadow::Subtree(root) => {
                path::strip_root(candidate, root).is_some_and(|rest| !rest.is_empty())
            }
            Shadow::Exact(target) => candidate == target,
        }
    }
}

/// One immutable source→target binding.
#[derive(Debug, Clone)]
pub struct Mount {
    source_path: PathBuf,
    target_path: String,
    directory: bool,
    target_dirs: Vec<String>,
    target_files: Vec<String>,
    converter: PathConverter,
}

impl Mount {
    /// Parse `spec` and enumerate everything the mount exposes.
    pub fn new(fs: &dyn FileSystem, spec: &str) -> Result<Self> {
        Self::from_spec(fs, &MountSpec::parse(spec)?)
    }

    /// Resolve a parsed spec against the filesystem.
    pub fn from_spec(fs: &dyn FileSystem, spec: &MountSpec) -> Result<Self> {
        let source_path = path::absolutize(Path::new(&spec.source))?;
        let kind = fs.stat(&source_path)?;

        let mut target_path = path::clean(&spec.target);
        if !path::is_absolute(&target_path) {
            return Err(Error::AbsolutePathRequired {
                context: "mount target".to_string(),
                path: target_path,
            });
        }

        if !kind.is_dir() && spec.source_trailing_separator {
            return Err(Error::MountInvalid {
                message: format!(
                    "source file mounted as directory: {}",
                    source_path.display()
                ),
            });
        }

        if spec.target_trailing_separator && !spec.source_trailing_separator {
            if let Some(name) = source_path.file_name() {
                target_path = path::join(&target_path, &name.to_string_lossy());
            }
        }

        let converter = PathConverter::new(source_path.clone(), target_path.clone());

        let mut target_dirs = Vec::new();
        let mut target_files = Vec::new();
        if kind.is_dir() {
            fs.walk(&source_path, &mut |entry, entry_kind| {
                let target = converter.source_to_target(entry)?;
                match entry_kind {
                    EntryKind::Directory => target_dirs.push(target),
                    EntryKind::File => target_files.push(target),
                }
                Ok(())
            })?;
        } else {
            target_files.push(converter.source_to_target(&source_path)?);
        }

        target_dirs.sort();
        target_files.sort();

        debug!(
            "Mounted {} at {} ({} files, {} directories)",
            source_path.display(),
            target_path,
            target_files.len(),
            target_dirs.len()
        );

        Ok(Self {
            source_path,
            target_path,
            directory: kind.is_dir(),
            target_dirs,
            target_files,
            converter,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    /// Returns true if the mount is backed by a directory.
    pub fn is_directory(&self) -> bool {
        self.directory
    }

    /// Every virtual directory the mount exposes, sorted.
    pub fn target_dirs(&self) -> &[String] {
        &self.target_dirs
    }

    /// Every virtual file the mount exposes, sorted.
    pub fn target_files(&self) -> &[String] {
        &self.target_files
    }

    /// What this mount hides from mounts with lower precedence.
    pub fn shadow(&self) -> Shadow {
        if self.directory {
            Shadow::Subtree(self.target_path.clone())
        } else {
            Shadow::Exact(self.target_path.clone())
        }
    }

    /// Append the directories matching `pattern` that no shadow covers.
    pub fn dirs(&self, pattern: &Pattern, out: &mut Vec<String>, shadows: &[Shadow]) {
        collect_matches(&self.target_dirs, pattern, out, shadows);
    }

    /// Append the files matching `pattern` that no shadow covers.
    pub fn files(&self, pattern: &Pattern, out: &mut Vec<String>, shadows: &[Shadow]) {
        collect_matches(&self.target_files, pattern, out, shadows);
    }

    /// Returns true if the mount exposes the virtual file `target`.
    pub fn contains_file(&self, target: &str) -> bool {
        self.target_files
            .binary_search_by(|probe| probe.as_str().cmp(target))
            .is_ok()
    }

    /// Read the virtual file `target` from the mount's source.
    pub fn read(&self, fs: &dyn FileSystem, target: &str) -> Result<Vec<u8>> {
        if !self.contains_file(target) {
            return Err(Error::NotFound {
                path: target.to_string(),
            });
        }

        let source = self.converter.target_to_source(target)?;
        fs.read(&source)
    }
}

fn collect_matches(entries: &[String], pattern: &Pattern, out: &mut Vec<String>, shadows: &[Shadow]) {
    for entry in entries {
        if shadows.iter().any(|shadow| shadow.covers(entry)) {
            continue;
        }
        if path::glob_matches(pattern, entry) {
            out.push(entry.clone());
        }
    }
}
