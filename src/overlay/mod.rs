//! # Overlay Filesystem
//!
//! A read-only virtual namespace composed from several real files and
//! directories.
//!
//! - **`converter`**: maps one real source root onto one virtual target root.
//! - **`mount`**: a single `source:target` binding with eagerly enumerated,
//!   sorted listings of everything it exposes.
//! - **`mount_set`**: the ordered stack of mounts. The mount declared first
//!   has the highest precedence; a directory mount shadows the whole subtree
//!   under its target for every mount declared after it, a file mount shadows
//!   only its exact target path.
//!
//! ```
//! use std::sync::Arc;
//! use tmpl::filesystem::MemoryFS;
//! use tmpl::overlay::MountSet;
//!
//! let fs = MemoryFS::new();
//! fs.add_file_string("/project/templates/main", "main").unwrap();
//! fs.add_file_string("/shared/templates/main", "shared").unwrap();
//! fs.add_file_string("/shared/templates/footer", "footer").unwrap();
//!
//! let mounts = MountSet::new(
//!     Arc::new(fs),
//!     &["/project/templates:/t", "/shared/templates:/shared"],
//! )
//! .unwrap();
//!
//! assert_eq!(mounts.files("/t/*").unwrap(), ["/t/main"]);
//! assert_eq!(mounts.read_to_string("/shared/footer").unwrap(), "footer");
//! ```

pub mod converter;
pub mod mount;
pub mod mount_set;

pub use converter::PathConverter;
pub use mount::{Mount, MountSpec, Shadow};
pub use mount_set::MountSet;
