//! Shared constants for Click2Hide.
//!
//! # Organization
//!
//! - `paths` - Directory and file names under the user's config directory
//! - `timing` - Debounce defaults
//! - `dock` - Built-in Dock label handling

/// Directory name used under every config search root.
pub const APP_DIR_NAME: &str = "click2hide";

/// Default minimum interval between Dock layout queries (ms).
pub const DEFAULT_REFRESH_DEBOUNCE_MS: u64 = 500;

/// Default log filter when neither `RUST_LOG` nor `logLevel` is set.
pub const DEFAULT_LOG_FILTER: &str = "click2hide=info,click2hide_lib=info";

/// Prefix for threads spawned by the daemon.
pub const THREAD_PREFIX: &str = "click2hide";

/// File and directory names.
pub mod paths {
    /// Name of the persisted preference file.
    pub const PREFERENCES_FILE_NAME: &str = "preferences.json";
}

/// Built-in Dock label handling.
pub mod dock {
    /// Bundle identifier of the Dock process.
    pub const DOCK_BUNDLE_ID: &str = "com.apple.dock";

    /// Dock items that are never hidden or restored.
    ///
    /// These are not applications (Trash, Downloads) or must keep their
    /// native click behavior (Launchpad).
    pub const DENYLIST: &[&str] = &["Launchpad", "Trash", "Downloads"];

    /// Dock labels whose running application reports a different name.
    pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
        ("Visual Studio Code", "Code"),
        ("Rosetta Stone Learn Languages", "Rosetta Stone"),
    ];
}
