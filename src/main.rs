//! # tmpl CLI
//!
//! Binary entry point for the `tmpl` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initialising logging.
//! - Dispatching to the selected command and reporting failures.
//!
//! All generation logic lives in the `tmpl` library crate; the binary is a
//! thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
