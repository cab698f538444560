//! # Ls Command Implementation
//!
//! Implements the `ls` subcommand, which lists the virtual files (or
//! directories) the mounts expose, exactly as the `files` and `dirs` template
//! callables would see them.
//!
//! This command is read-only.

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use tmpl::filesystem::OsFileSystem;
use tmpl::overlay::MountSet;

/// List the files or directories visible through the mounts
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Mount a source at a virtual path (SOURCE:TARGET). Repeatable; earlier
    /// mounts take precedence over later ones.
    #[arg(short, long = "mount", value_name = "SOURCE:TARGET", required = true)]
    pub mounts: Vec<String>,

    /// List directories instead of files
    #[arg(short, long)]
    pub dirs: bool,

    /// Show only the number of matching entries
    #[arg(long)]
    pub count: bool,

    /// Glob pattern over virtual paths; `*` never crosses a `/`
    #[arg(value_name = "PATTERN", default_value = "/**/*")]
    pub pattern: String,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs) -> Result<()> {
    let mounts = MountSet::new(Arc::new(OsFileSystem::new()), args.mounts.as_slice())
        .context("failed to mount sources")?;

    let entries = if args.dirs {
        mounts.directories(&args.pattern)
    } else {
        mounts.files(&args.pattern)
    }
    .with_context(|| format!("invalid pattern '{}'", args.pattern))?;

    if args.count {
        println!("{}", entries.len());
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry);
    }
    Ok(())
}
