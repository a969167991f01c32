//! Enable, disable, toggle and status commands.
//!
//! These only touch the preferences file; a running daemon notices the change
//! through its file watcher.

use colored::Colorize;

use crate::error::Click2HideError;
use crate::preferences::PreferenceStore;

/// Writes the enabled flag and reports the new state.
///
/// # Errors
///
/// Returns an error if the preferences file cannot be written.
pub fn set_enabled(enabled: bool) -> Result<(), Click2HideError> {
    let store = PreferenceStore::open_default()?;
    store.set_enabled(enabled)?;
    println!("Click2Hide is now {}", state_label(enabled));
    Ok(())
}

/// Flips the enabled flag and reports the new state.
///
/// # Errors
///
/// Returns an error if the preferences file cannot be read or written.
pub fn toggle() -> Result<(), Click2HideError> {
    let store = PreferenceStore::open_default()?;
    let enabled = store.toggle()?;
    println!("Click2Hide is now {}", state_label(enabled));
    Ok(())
}

/// Prints the enabled flag, the preferences path and the Accessibility state.
///
/// # Errors
///
/// Returns an error if the preferences file exists but cannot be read.
pub fn status() -> Result<(), Click2HideError> {
    let store = PreferenceStore::open_default()?;

    println!("Click2Hide:    {}", state_label(store.get_enabled()));
    println!("Preferences:   {}", store.path().display());

    #[cfg(target_os = "macos")]
    {
        let trusted = crate::platform::has_accessibility();
        let label = if trusted { "granted".green() } else { "not granted".red() };
        println!("Accessibility: {label}");
    }

    Ok(())
}

fn state_label(enabled: bool) -> colored::ColoredString {
    if enabled { "enabled".green().bold() } else { "disabled".yellow().bold() }
}
