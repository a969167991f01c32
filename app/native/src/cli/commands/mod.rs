//! CLI command definitions using Clap.
//!
//! - `config_cmd` - Configuration file management commands
//! - `preferences_cmd` - Enable, disable, toggle and status
//! - `dock_cmd` - One-shot Dock layout dump

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::Click2HideError;
use crate::{config, schema};

pub mod config_cmd;
pub mod dock_cmd;
pub mod preferences_cmd;

pub use config_cmd::ConfigCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Click2Hide - click a running app's Dock icon again to hide it.
#[derive(Parser, Debug)]
#[command(name = "click2hide")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Run the background daemon (default when no command is given).
    ///
    /// Installs the global click hook and keeps the Dock layout current.
    /// Requires Accessibility permission; if it is missing, the daemon keeps
    /// running and asks for it.
    Run,

    /// Turn click-to-hide on.
    ///
    /// A running daemon picks the change up immediately.
    Enable,

    /// Turn click-to-hide off.
    ///
    /// Dock clicks behave normally until re-enabled.
    Disable,

    /// Flip click-to-hide on or off.
    Toggle,

    /// Show whether click-to-hide is on and whether the process is trusted
    /// for Accessibility.
    Status,

    /// Print the Dock icons and their on-screen rectangles.
    ///
    /// Reads the layout once through the Accessibility API, the same way the
    /// daemon does.
    Dock {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Configuration file management commands.
    ///
    /// Initialize and locate the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Click2Hide configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(click2hide completions --shell zsh)"
    ///   click2hide completions --shell fish > ~/.config/fish/completions/click2hide.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), Click2HideError> {
        if let Some(path) = &self.config {
            if !path.exists() {
                return Err(config::ConfigError::NotFound.into());
            }
            config::set_custom_config_path(path.clone());
        }

        match self.command.as_ref().unwrap_or(&Commands::Run) {
            Commands::Run => crate::run(),
            Commands::Enable => preferences_cmd::set_enabled(true),
            Commands::Disable => preferences_cmd::set_enabled(false),
            Commands::Toggle => preferences_cmd::toggle(),
            Commands::Status => preferences_cmd::status(),
            Commands::Dock { json } => dock_cmd::execute(*json),
            Commands::Config(cmd) => cmd.execute(),

            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "click2hide", &mut io::stdout());
    }
}
