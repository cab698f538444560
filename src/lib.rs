//! # tmpl
//!
//! Generates text files from templates read through a virtual, layered
//! filesystem. Several host directories or files are *mounted* at virtual
//! paths; the resulting overlay is what templates see when they list files,
//! include each other, or read raw text.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use tmpl::filesystem::MemoryFS;
//! use tmpl::generate::{generate, GenerateRequest};
//!
//! let fs = Arc::new(MemoryFS::new());
//! fs.add_file_string("/src/readme", "# {{ Name }}").unwrap();
//! fs.add_file_string("/config.yaml", "Config:\n  Name: tmpl").unwrap();
//!
//! let request = GenerateRequest {
//!     template: "/t/readme".to_string(),
//!     mounts: vec!["/src:/t".to_string()],
//!     configs: vec![PathBuf::from("/config.yaml")],
//!     out: PathBuf::from("/README.md"),
//!     ..Default::default()
//! };
//! generate(fs.clone(), &request).unwrap();
//!
//! assert_eq!(fs.file_string("/README.md").unwrap(), "# tmpl");
//! ```
//!
//! ## Core Concepts
//!
//! - **Filesystem (`filesystem`)**: the `FileSystem` capability, with a host
//!   implementation and an in-memory one for tests and dry runs.
//! - **Overlay (`overlay`)**: mounts and the ordered `MountSet` that merges
//!   them into one virtual namespace, earliest-declared mount first.
//! - **Configuration (`config`, `merge`)**: YAML documents with a top-level
//!   `Config` mapping, deep-merged left to right.
//! - **Templates (`template`)**: compile-once template cache and the
//!   callables (`include`, `files`, ...) templates use to reach the overlay.
//! - **Generation (`generate`)**: one complete run from mounts and
//!   configuration to a written output file.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod generate;
pub mod merge;
pub mod overlay;
pub mod path;
pub mod template;

#[cfg(test)]
mod path_proptest;
