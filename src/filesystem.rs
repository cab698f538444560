//! Filesystem capability used by mounts, configuration loading and output.
//!
//! The core never touches `std::fs` directly. It is handed a [`FileSystem`]
//! implementation instead: [`OsFileSystem`] for real runs and [`MemoryFS`]
//! for tests, where whole source trees can be staged without touching disk.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// The kind of filesystem entry found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Returns true for directories.
    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// Filesystem operations the core needs.
///
/// Implementations must be shareable across threads: mounts and the template
/// cache read through the same instance from every worker.
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// Returns the kind of entry at `path`, or [`Error::NotFound`].
    fn stat(&self, path: &Path) -> Result<EntryKind>;

    /// Reads the full contents of the file at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Reads the file at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: {}", path.display(), e),
            ))
        })
    }

    /// Visits `root` and everything below it, parents before children.
    ///
    /// The root itself is always the first entry visited.
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(&Path, EntryKind) -> Result<()>)
        -> Result<()>;

    /// Creates (or truncates) the file at `path` and returns a writer for it.
    fn create<'a>(&'a self, path: &Path) -> Result<Box<dyn Write + 'a>>;
}

/// Translate an I/O error, turning "not found" into [`Error::NotFound`].
fn io_error(err: io::Error, path: &Path) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::NotFound {
            path: path.display().to_string(),
        }
    } else {
        Error::Io(err)
    }
}

/// [`FileSystem`] backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn stat(&self, path: &Path) -> Result<EntryKind> {
        let metadata = std::fs::metadata(path).map_err(|e| io_error(e, path))?;
        Ok(if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| io_error(e, path))
    }

    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Path, EntryKind) -> Result<()>,
    ) -> Result<()> {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| io_error(e.into(), root))?;
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            visit(entry.path(), kind)?;
        }
        Ok(())
    }

    fn create<'a>(&'a self, path: &Path) -> Result<Box<dyn Write + 'a>> {
        let file = std::fs::File::create(path).map_err(|e| io_error(e, path))?;
        Ok(Box::new(io::BufWriter::new(file)))
    }
}

/// Represents a file with content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// File content as bytes
    pub content: Vec<u8>,
}

impl File {
    /// Create a new file with content
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Create a new file from string content
    pub fn from_string(content: &str) -> Self {
        Self::new(content.as_bytes().to_vec())
    }

    /// Get file size in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[derive(Debug, Clone)]
enum Node {
    File(File),
    Directory,
}

/// In-memory filesystem for tests and dry runs.
///
/// Adding a file implicitly creates every ancestor directory, so a staged
/// tree can be walked exactly like a real one.
#[derive(Debug, Default)]
pub struct MemoryFS {
    entries: RwLock<BTreeMap<PathBuf, Node>>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<RwLockReadGuard<'_, BTreeMap<PathBuf, Node>>> {
        self.entries.read().map_err(|_| Error::LockPoisoned {
            context: "memory filesystem".to_string(),
        })
    }

    fn entries_mut(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<PathBuf, Node>>> {
        self.entries.write().map_err(|_| Error::LockPoisoned {
            context: "memory filesystem".to_string(),
        })
    }

    fn insert_ancestors(entries: &mut BTreeMap<PathBuf, Node>, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Directory);
        }
    }

    /// Add or update a file
    pub fn add_file<P: AsRef<Path>>(&self, path: P, file: File) -> Result<()> {
        let path = path.as_ref();
        let mut entries = self.entries_mut()?;
        if let Some(Node::Directory) = entries.get(path) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a directory", path.display()),
            )));
        }
        Self::insert_ancestors(&mut entries, path);
        entries.insert(path.to_path_buf(), Node::File(file));
        Ok(())
    }

    /// Add a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&self, path: P, content: &str) -> Result<()> {
        self.add_file(path, File::from_string(content))
    }

    /// Create a directory and all of its ancestors
    pub fn add_dir<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut entries = self.entries_mut()?;
        if let Some(Node::File(_)) = entries.get(path) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a file", path.display()),
            )));
        }
        Self::insert_ancestors(&mut entries, path);
        entries.insert(path.to_path_buf(), Node::Directory);
        Ok(())
    }

    /// Get a copy of a file by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<File> {
        match self.entries().ok()?.get(path.as_ref()) {
            Some(Node::File(file)) => Some(file.clone()),
            _ => None,
        }
    }

    /// Read a file as a string, if it exists and is valid UTF-8
    pub fn file_string<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        self.get_file(path)
            .and_then(|file| String::from_utf8(file.content).ok())
    }

    /// Check if a file or directory exists
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries()
            .map(|entries| entries.contains_key(path.as_ref()))
            .unwrap_or(false)
    }

    /// List all files
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.entries()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, node)| matches!(node, Node::File(_)))
                    .map(|(path, _)| path.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.list_files().len()
    }

    /// Check if filesystem has no files
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn append(&self, path: &Path, buf: &[u8]) -> Result<()> {
        let mut entries = self.entries_mut()?;
        match entries.get_mut(path) {
            Some(Node::File(file)) => {
                file.content.extend_from_slice(buf);
                Ok(())
            }
            _ => Err(Error::NotFound {
                path: path.display().to_string(),
            }),
        }
    }
}

impl FileSystem for MemoryFS {
    fn stat(&self, path: &Path) -> Result<EntryKind> {
        match self.entries()?.get(path) {
            Some(Node::File(_)) => Ok(EntryKind::File),
            Some(Node::Directory) => Ok(EntryKind::Directory),
            None => Err(Error::NotFound {
                path: path.display().to_string(),
            }),
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        match self.entries()?.get(path) {
            Some(Node::File(file)) => Ok(file.content.clone()),
            Some(Node::Directory) => Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ))),
            None => Err(Error::NotFound {
                path: path.display().to_string(),
            }),
        }
    }

    fn walk(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Path, EntryKind) -> Result<()>,
    ) -> Result<()> {
        // Snapshot first so `visit` may call back into the filesystem.
        let visited: Vec<(PathBuf, EntryKind)> = {
            let entries = self.entries()?;
            if !entries.contains_key(root) {
                return Err(Error::NotFound {
                    path: root.display().to_string(),
                });
            }
            entries
                .range(root.to_path_buf()..)
                .take_while(|(path, _)| path.starts_with(root))
                .map(|(path, node)| {
                    let kind = match node {
                        Node::File(_) => EntryKind::File,
                        Node::Directory => EntryKind::Directory,
                    };
                    (path.clone(), kind)
                })
                .collect()
        };

        for (path, kind) in visited {
            visit(&path, kind)?;
        }
        Ok(())
    }

    fn create<'a>(&'a self, path: &Path) -> Result<Box<dyn Write + 'a>> {
        // Like the host filesystem, parents must already exist.
        if let Some(parent) = path.parent().filter(|p| p.parent().is_some()) {
            if !matches!(self.entries()?.get(parent), Some(Node::Directory)) {
                return Err(Error::NotFound {
                    path: path.display().to_string(),
                });
            }
        }

        self.add_file(path, File::default())?;
        Ok(Box::new(MemoryWriter {
            fs: self,
            path: path.to_path_buf(),
        }))
    }
}

/// Writer returned by `MemoryFS::create`; appends straight into the file.
struct MemoryWriter<'a> {
    fs: &'a MemoryFS,
    path: PathBuf,
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.fs
            .append(&self.path, buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
