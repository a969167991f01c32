//! CLI module for Click2Hide.
//!
//! With no command (or `run`) the binary becomes the background daemon. Every
//! other command is a one-shot that edits the preferences file, prints
//! configuration helpers, or dumps the Dock layout.

mod commands;

use clap::Parser;
pub use commands::{Cli, Commands};

use crate::error::Click2HideError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), Click2HideError> {
    let cli = Cli::parse();
    cli.execute()
}
