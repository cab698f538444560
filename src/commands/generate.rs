//! # Generate Command Implementation
//!
//! Implements the `generate` subcommand (alias `g`): mounts the given sources,
//! merges the configuration documents and renders one template into the
//! output file.
//!
//! ```bash
//! tmpl generate \
//!     --mount ./templates:/templates \
//!     --mount ./shared:/templates/shared \
//!     --config base.yaml --config local.yaml \
//!     --out README.md \
//!     /templates/README.md
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use tmpl::filesystem::OsFileSystem;
use tmpl::generate::{generate, GenerateRequest};
use tmpl::template::Options;

/// Render a template through the mounted filesystem into a file
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Mount a source at a virtual path (SOURCE:TARGET). Repeatable; earlier
    /// mounts take precedence over later ones.
    #[arg(short, long = "mount", value_name = "SOURCE:TARGET", required = true)]
    pub mounts: Vec<String>,

    /// Configuration document with a top-level `Config` mapping. Repeatable;
    /// later documents override earlier ones.
    #[arg(short, long = "config", value_name = "FILE")]
    pub configs: Vec<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub out: PathBuf,

    /// Suppress the summary line
    #[arg(short, long)]
    pub quiet: bool,

    /// Absolute virtual path of the template to render
    #[arg(value_name = "TEMPLATE")]
    pub template: String,
}

/// Execute the `generate` command.
pub fn execute(args: GenerateArgs) -> Result<()> {
    let request = GenerateRequest {
        template: args.template,
        mounts: args.mounts,
        configs: args.configs,
        out: args.out,
        options: Options::default(),
    };

    let report = generate(Arc::new(OsFileSystem::new()), &request)
        .with_context(|| format!("failed to generate {}", request.template))?;

    if !args.quiet {
        println!("{}", report.summary());
    }
    Ok(())
}
