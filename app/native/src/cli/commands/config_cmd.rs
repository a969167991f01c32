//! `click2hide config` subcommands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use colored::Colorize;

use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{ConfigError, config_paths, custom_config_path};
use crate::error::Click2HideError;

/// File name used when no per-user config directory can be determined.
const FALLBACK_FILE_NAME: &str = "config.jsonc";

#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Write a documented configuration template.
    ///
    /// Every option is present but commented out, so the daemon behaves as
    /// if the file did not exist until something is uncommented.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  click2hide config init                          # ~/.config/click2hide/config.jsonc
  click2hide config init --path ./click2hide.jsonc
  click2hide config init --force                  # replace an existing file
  click2hide config init --stdout > config.jsonc"#
    )]
    Init {
        /// Replace the file if it already exists.
        #[arg(long, short)]
        force: bool,

        /// Write here instead of the first search path.
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the template instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// List where the daemon looks for its configuration.
    ///
    /// The first existing file wins; later ones are marked as shadowed.
    Path,
}

/// How a search path relates to the file the daemon would load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathState {
    Active,
    Shadowed,
    Missing,
}

impl ConfigCommands {
    /// Runs the subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if `init` finds an existing file without `--force`,
    /// or if the template cannot be written.
    pub fn execute(&self) -> Result<(), Click2HideError> {
        match self {
            Self::Init { stdout: true, .. } => {
                println!("{}", generate_config_template());
            }
            Self::Init { force, path, .. } => {
                let target = init_target(path.as_deref());
                write_template(&target, *force)?;
                println!("Wrote {}", target.display().to_string().bold());
                println!("All options are commented out; uncomment the ones you want to change.");
            }
            Self::Path => print_search_paths(),
        }
        Ok(())
    }
}

/// Picks where `config init` writes: the explicit path, else the highest
/// priority search path.
fn init_target(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from(FALLBACK_FILE_NAME)),
        Path::to_path_buf,
    )
}

fn write_template(target: &Path, force: bool) -> Result<(), ConfigError> {
    if target.exists() && !force {
        return Err(ConfigError::AlreadyExists(target.to_path_buf()));
    }
    create_config_file(target)?;
    Ok(())
}

/// Pairs each candidate with its state. Only the first existing file is
/// active.
fn classify(candidates: Vec<PathBuf>) -> Vec<(PathBuf, PathState)> {
    let mut seen_active = false;
    candidates
        .into_iter()
        .map(|path| {
            let state = match (path.exists(), seen_active) {
                (false, _) => PathState::Missing,
                (true, false) => {
                    seen_active = true;
                    PathState::Active
                }
                (true, true) => PathState::Shadowed,
            };
            (path, state)
        })
        .collect()
}

fn print_search_paths() {
    // `--config` replaces the search entirely
    let candidates = custom_config_path().map_or_else(config_paths, |path| vec![path.clone()]);
    let report = classify(candidates);

    for (index, (path, state)) in report.iter().enumerate() {
        let marker = match state {
            PathState::Active => " (active)".green().to_string(),
            PathState::Shadowed => " (shadowed)".yellow().to_string(),
            PathState::Missing => String::new(),
        };
        println!("{:>3}. {}{marker}", index + 1, path.display());
    }

    if !report.iter().any(|(_, state)| *state == PathState::Active) {
        println!("\nNo configuration file found; defaults are in effect.");
        println!("Run `click2hide config init` to create one.");
    }
}
