//! # Completions Command Implementation
//!
//! Implements the `completions` subcommand, which prints a shell completion
//! script generated by `clap_complete` for every `tmpl` command and option.
//!
//! ```bash
//! tmpl completions bash > ~/.local/share/bash-completion/completions/tmpl
//! tmpl completions zsh > ~/.zfunc/_tmpl
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command, writing the script to stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
