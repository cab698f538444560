//! # Error Handling
//!
//! This module defines the centralized error type for `tmpl`. It uses the
//! `thiserror` library to build a single `Error` enum covering every failure a
//! generation run can hit, from malformed mount specs to template failures
//! several includes deep.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failures. Variants carry the path or message
//!   needed to diagnose the problem without a stack trace.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Nothing in the library retries: every failure is either a permanent input
//! error (bad mount spec, missing file, invalid configuration) or a logic
//! error. Only the binary decides to print and exit.

use thiserror::Error;

/// Main error type for tmpl operations
#[derive(Error, Debug)]
pub enum Error {
    /// A mount spec was malformed or contradicted the source it names.
    #[error("invalid mount: {message}")]
    MountInvalid { message: String },

    /// A mount target or template name was not an absolute virtual path.
    #[error("absolute path required: {context}: {path}")]
    AbsolutePathRequired { context: String, path: String },

    /// A source path does not exist, or no mount exposes a virtual path.
    #[error("file does not exist: {path}")]
    NotFound { path: String },

    /// A configuration document is missing its required `Config` mapping.
    #[error("invalid config: {message}")]
    ConfigInvalid { message: String },

    /// A path handed to a path converter was not under the expected root.
    ///
    /// Mounts only ever convert paths they enumerated themselves, so this
    /// indicates a construction bug rather than bad input.
    #[error("path {path} is not under {root}")]
    PathNotUnderRoot { path: String, root: String },

    /// The template engine rejected a template source.
    #[error("failed to compile template {name}: {message}")]
    Compile { name: String, message: String },

    /// The template engine failed while rendering a template.
    #[error("failed to execute template {name}: {message}")]
    Execution { name: String, message: String },

    /// An `include` or `includeText` call failed for the given path.
    #[error("{source}: {path}")]
    Include {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// A lock guarding shared state was poisoned by a panicking thread.
    #[error("lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Returns true when the error, or the error an include wraps, means that
    /// a path does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Include { source, .. } => source.is_not_found(),
            Error::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
