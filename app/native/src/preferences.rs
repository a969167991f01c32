//! Persisted on/off switch for click-to-hide.
//!
//! The switch lives in `preferences.json` next to the configuration so that
//! the CLI (`click2hide enable|disable|toggle`) can flip it while the daemon
//! is running. The daemon watches the file and republishes changes through a
//! `tokio::sync::watch` channel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::constants::APP_DIR_NAME;
use crate::constants::paths::PREFERENCES_FILE_NAME;
use crate::error::PreferenceError;

/// On-disk shape of the preferences file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct Preferences {
    enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self { Self { enabled: true } }
}

/// File-backed store for the enabled flag.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    state: watch::Sender<bool>,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    /// Returns the default preferences file location.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::NoDirectory`] if the user's config
    /// directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, PreferenceError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(PREFERENCES_FILE_NAME))
            .ok_or(PreferenceError::NoDirectory)
    }

    /// Opens the store at the default location.
    ///
    /// # Errors
    ///
    /// See [`default_path`](Self::default_path) and [`open`](Self::open).
    pub fn open_default() -> Result<Self, PreferenceError> { Self::open(Self::default_path()?) }

    /// Opens the store backed by `path`.
    ///
    /// A missing file means "enabled". A corrupt file is logged and also
    /// treated as enabled; it is rewritten on the next `set_enabled`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn open(path: PathBuf) -> Result<Self, PreferenceError> {
        let enabled = match read_preferences(&path) {
            Ok(prefs) => prefs.enabled,
            Err(PreferenceError::Parse(err)) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid preferences file, using defaults");
                Preferences::default().enabled
            }
            Err(err) => return Err(err),
        };

        let (state, _) = watch::channel(enabled);
        Ok(Self { path, state, write_lock: Mutex::new(()) })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Returns whether click-to-hide is enabled.
    #[must_use]
    pub fn get_enabled(&self) -> bool { *self.state.borrow() }

    /// Persists a new value and notifies subscribers if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), PreferenceError> {
        let _guard = self.write_lock.lock();
        write_preferences(&self.path, Preferences { enabled })?;
        self.publish(enabled);
        Ok(())
    }

    /// Flips the stored value.
    ///
    /// # Returns
    ///
    /// The new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn toggle(&self) -> Result<bool, PreferenceError> {
        let enabled = !self.get_enabled();
        self.set_enabled(enabled)?;
        Ok(enabled)
    }

    /// Subscribes to changes of the enabled flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> { self.state.subscribe() }

    /// Re-reads the file and publishes its value.
    ///
    /// A deleted file resets the flag to enabled. A corrupt file leaves the
    /// current value in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn reload(&self) -> Result<bool, PreferenceError> {
        let enabled = read_preferences(&self.path)?.enabled;
        self.publish(enabled);
        Ok(enabled)
    }

    /// Starts watching the preferences file for changes made by other
    /// processes.
    ///
    /// The returned watcher must be kept alive for as long as changes should
    /// be picked up.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or watched.
    pub fn watch(self: &Arc<Self>) -> Result<PreferenceWatcher, PreferenceError> {
        let Some(dir) = self.path.parent().map(Path::to_path_buf) else {
            return Err(PreferenceError::NoDirectory);
        };
        fs::create_dir_all(&dir)?;

        let file_name = self.path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
        let store = Arc::downgrade(self);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "preferences watch error");
                    return;
                }
            };

            if matches!(event.kind, EventKind::Access(_)) {
                return;
            }

            // Watch the parent directory to catch atomic replace-by-rename
            let affects_prefs = event.paths.iter().any(|p| p.file_name().is_some_and(|name| name == file_name));
            if !affects_prefs {
                return;
            }

            let Some(store) = store.upgrade() else {
                return;
            };

            match store.reload() {
                Ok(enabled) => tracing::debug!(enabled, "preferences reloaded"),
                Err(err) => tracing::debug!(error = %err, "preferences reload skipped"),
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %self.path.display(), "watching preferences file");

        Ok(PreferenceWatcher { _watcher: watcher })
    }

    fn publish(&self, enabled: bool) {
        let changed = self.state.send_if_modified(|current| {
            if *current == enabled {
                false
            } else {
                *current = enabled;
                true
            }
        });

        if changed {
            tracing::info!(enabled, "click-to-hide preference changed");
        }
    }
}

/// Keeps the preferences file watcher alive.
pub struct PreferenceWatcher {
    _watcher: RecommendedWatcher,
}

impl std::fmt::Debug for PreferenceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceWatcher").finish_non_exhaustive()
    }
}

fn read_preferences(path: &Path) -> Result<Preferences, PreferenceError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
        Err(err) => Err(err.into()),
    }
}

fn write_preferences(path: &Path, prefs: Preferences) -> Result<(), PreferenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write then rename so a watcher never reads a half-written file
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(&prefs)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
