//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// Click2Hide Configuration File
// =============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
//
// Turning the feature on or off is not a config option; use
// `click2hide enable` / `click2hide disable` instead.

{
  // ============================================================================
  // Dock Refresh
  // ============================================================================
  // Minimum time in milliseconds between two reads of the Dock layout.
  // Launching, quitting and switching apps trigger a refresh; bursts of
  // events inside this window are coalesced into one read.
  // "refreshDebounceMs": 500,

  // ============================================================================
  // Aliases
  // ============================================================================
  // Map the label shown under a Dock icon to the running application's name
  // when the two differ. Built-in aliases:
  //   "Visual Studio Code" -> "Code"
  //   "Rosetta Stone Learn Languages" -> "Rosetta Stone"
  // "aliases": {
  //   "Visual Studio Code - Insiders": "Code - Insiders"
  // },

  // ============================================================================
  // Ignored Items
  // ============================================================================
  // Dock labels that clicks should never hide or restore. Launchpad, Trash
  // and Downloads are always ignored. Matching is exact.
  // "ignoredItems": [],

  // ============================================================================
  // Logging
  // ============================================================================
  // Log filter directive, same syntax as RUST_LOG (which takes priority).
  // "logLevel": "click2hide=info"
}
"##
    .to_string()
}

/// Writes the configuration template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
