//! # CLI Command Implementations
//!
//! Each subcommand of the `tmpl` tool lives in its own file and contains:
//! - An `Args` struct defining the command's arguments, derived using `clap`.
//! - An `execute` function taking the parsed `Args` and calling into the
//!   `tmpl` library.

pub mod completions;
pub mod generate;
pub mod ls;
