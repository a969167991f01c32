//! Error types for Click2Hide.
//!
//! Each concern owns a small error enum; [`Click2HideError`] unifies them for
//! the daemon and CLI entry points.

use thiserror::Error;

pub use crate::config::ConfigError;

/// Errors raised while reading the Dock's icon layout.
#[derive(Debug, Error)]
pub enum IntrospectionError {
    /// No process named `Dock` is running.
    #[error("Dock process is not running")]
    DockNotRunning,
    /// The process is not trusted for Accessibility.
    #[error("Accessibility permission has not been granted")]
    NotTrusted,
    /// An Accessibility call failed with the given `AXError` code.
    #[error("Accessibility call failed while reading {what} (AXError {code})")]
    Accessibility { what: &'static str, code: i32 },
    /// The Dock returned no clickable icons; the layout is temporarily unknown.
    #[error("Dock reported no icons")]
    Empty,
    /// Dock introspection is not available on this platform.
    #[error("Dock introspection is only supported on macOS")]
    Unsupported,
}

/// Errors raised while restoring or hiding an application.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// The dock label could not be mapped to a running application.
    #[error("No running application matches \"{0}\"")]
    NotRunning(String),
    /// Launching or activating by name failed.
    #[error("Failed to launch or activate \"{name}\"")]
    Launch { name: String },
    /// A single `NSRunningApplication` request returned `NO`.
    #[error("{step} request for \"{name}\" was refused")]
    Refused { step: &'static str, name: String },
}

/// Errors raised while installing the global click hook.
#[derive(Debug, Error)]
pub enum HookError {
    /// `CGEventTapCreate` returned null, usually because the process lacks
    /// Accessibility permission.
    #[error("Failed to create event tap (Accessibility permission required)")]
    TapCreation,
    /// The tap's run loop source could not be created.
    #[error("Failed to create run loop source for event tap")]
    RunLoopSource,
    /// The thread that owns the tap could not be spawned.
    #[error("Failed to spawn event tap thread: {0}")]
    Thread(#[from] std::io::Error),
    /// Global hooks are not available on this platform.
    #[error("Global click hooks are only supported on macOS")]
    Unsupported,
}

/// Errors raised by the persisted preference store.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// No per-user configuration directory could be determined.
    #[error("Could not determine the preferences directory")]
    NoDirectory,
    /// Reading or writing the preferences file failed.
    #[error("Preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The preferences file is not valid JSON.
    #[error("Invalid preferences file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The file watcher could not be started.
    #[error("Failed to watch preferences file: {0}")]
    Watch(#[from] notify::Error),
}

/// Top-level error for the daemon and CLI.
#[derive(Debug, Error)]
pub enum Click2HideError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Preference error: {0}")]
    Preference(#[from] PreferenceError),
    #[error("Hook registration error: {0}")]
    HookRegistration(#[from] HookError),
    #[error("Introspection error: {0}")]
    Introspection(#[from] IntrospectionError),
    #[error("Action execution error: {0}")]
    ActionExecution(#[from] ActivationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introspection_error_display() {
        let err = IntrospectionError::Accessibility { what: "AXChildren", code: -25204 };
        let msg = err.to_string();
        assert!(msg.contains("AXChildren"));
        assert!(msg.contains("-25204"));
    }

    #[test]
    fn test_activation_error_display() {
        let err = ActivationError::Refused { step: "hide", name: "Mail".to_string() };
        assert_eq!(err.to_string(), "hide request for \"Mail\" was refused");
    }

    #[test]
    fn test_hook_error_mentions_permission() {
        assert!(HookError::TapCreation.to_string().contains("Accessibility"));
    }

    #[test]
    fn test_preference_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PreferenceError = io_err.into();
        assert!(err.to_string().contains("Preferences I/O error"));
    }

    #[test]
    fn test_top_level_wraps_sources() {
        let err: Click2HideError = IntrospectionError::DockNotRunning.into();
        assert!(err.to_string().contains("Dock process is not running"));

        let err: Click2HideError = HookError::TapCreation.into();
        assert!(err.to_string().starts_with("Hook registration error"));

        let err: Click2HideError = ActivationError::NotRunning("Mail".to_string()).into();
        assert!(err.to_string().contains("Mail"));
    }

    #[test]
    fn test_json_error_keeps_its_own_variant() {
        fn parse(text: &str) -> Result<serde_json::Value, Click2HideError> { Ok(serde_json::from_str(text)?) }

        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, Click2HideError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_hook_error_from_spawn_failure() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "no threads left");
        let err: HookError = io_err.into();
        assert!(matches!(err, HookError::Thread(_)));
        assert!(err.to_string().contains("no threads left"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: Click2HideError = ConfigError::NotFound.into();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
