//! Configuration types for Click2Hide.
//!
//! The configuration file is optional; every key has a default so an empty
//! object (or no file at all) yields a working setup.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{APP_DIR_NAME, DEFAULT_REFRESH_DEBOUNCE_MS};

/// Root configuration structure.
///
/// ```jsonc
/// {
///   "refreshDebounceMs": 500,
///   "aliases": { "Visual Studio Code": "Code" },
///   "ignoredItems": ["Screenshots"],
///   "logLevel": "click2hide=debug"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Click2HideConfig {
    /// Minimum interval between two Dock layout queries, in milliseconds.
    /// Default: 500
    pub refresh_debounce_ms: u64,

    /// Dock label to application name overrides.
    ///
    /// Use this when the name shown under a Dock icon differs from the
    /// application's process name. Entries here replace built-in aliases
    /// with the same key.
    pub aliases: HashMap<String, String>,

    /// Additional Dock labels that should never be hidden or restored.
    ///
    /// These are added to the built-in list (Launchpad, Trash, Downloads).
    /// Matching is exact and case-sensitive.
    pub ignored_items: Vec<String>,

    /// Log filter directive (same syntax as `RUST_LOG`).
    /// `RUST_LOG` takes priority when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for Click2HideConfig {
    fn default() -> Self {
        Self {
            refresh_debounce_ms: DEFAULT_REFRESH_DEBOUNCE_MS,
            aliases: HashMap::new(),
            ignored_items: Vec::new(),
            log_level: None,
        }
    }
}

impl Click2HideConfig {
    /// Returns the refresh debounce interval.
    #[must_use]
    pub const fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_debounce_ms)
    }
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/click2hide/config.jsonc or \
         ~/Library/Application Support/click2hide/config.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
    /// `config init` would overwrite an existing file.
    #[error("Configuration file already exists at {} (pass --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/click2hide/` if the variable is set
/// 2. `~/.config/click2hide/`
/// 3. `~/Library/Application Support/click2hide/` (macOS native)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    config_paths_from(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        dirs::home_dir(),
        dirs::config_dir(),
    )
}

fn config_paths_from(
    xdg_config: Option<PathBuf>,
    home: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Vec<PathBuf> {
    let dirs = [xdg_config, home.map(|h| h.join(".config")), config_dir];

    let mut paths: Vec<PathBuf> = Vec::new();
    for base in dirs.into_iter().flatten() {
        let app_dir = base.join(APP_DIR_NAME);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            // XDG_CONFIG_HOME is often ~/.config itself
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(Click2HideConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}

/// Loads the configuration from a specific file.
///
/// Comments (`//` and `/* */`) are stripped before parsing.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, or an I/O or
/// parse error if it cannot be read.
pub fn load_config_from_path(path: &Path) -> Result<(Click2HideConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: Click2HideConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}
