//! Click2Hide - click a running app's Dock icon again to hide it.
//!
//! This library provides both the background daemon and the CLI. The daemon
//! installs a global left-click hook, hit-tests clicks against a cached Dock
//! layout, and hides or restores the clicked application.

// Core modules
pub mod activation;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dock;
pub mod error;
pub mod interceptor;
pub mod logging;
pub mod preferences;
pub mod schema;
pub mod service;

// Daemon modules
#[cfg(target_os = "macos")]
mod platform;
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod utils;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::config::Click2HideConfig;
use crate::constants::THREAD_PREFIX;
use crate::error::Click2HideError;
use crate::preferences::PreferenceStore;

/// Tokio worker threads; refreshes are short and rare.
const WORKER_THREADS: usize = 2;

/// Runs the background daemon.
///
/// Loads configuration, installs logging, opens the preference store, and
/// then hands the main thread to the platform run loop. Only returns early on
/// a setup failure.
///
/// # Errors
///
/// Returns an error if the preference store or the async runtime cannot be
/// created, or if the platform is not supported.
pub fn run() -> Result<(), Click2HideError> {
    let config = config::init();
    logging::init(config.log_level.as_deref());

    match config::get_config_path() {
        Some(path) => tracing::info!(path = %path.display(), "configuration loaded"),
        None => tracing::info!("using default configuration"),
    }

    let preferences = Arc::new(PreferenceStore::open_default()?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(WORKER_THREADS)
        .thread_name(format!("{THREAD_PREFIX}-worker"))
        .enable_time()
        .build()?;

    run_daemon(config, &preferences, &runtime)
}

#[cfg(target_os = "macos")]
fn run_daemon(
    config: &Click2HideConfig,
    preferences: &Arc<PreferenceStore>,
    runtime: &tokio::runtime::Runtime,
) -> Result<(), Click2HideError> {
    use core_foundation::runloop::CFRunLoop;

    use crate::service::{ActivationService, ServiceParts};

    let _preference_watcher = preferences
        .watch()
        .inspect_err(|err| tracing::warn!(error = %err, "preference changes will not be picked up live"))
        .ok();

    let service = ActivationService::new(config, runtime.handle().clone(), preferences.get_enabled(), ServiceParts {
        provider: Arc::new(platform::AxDockLayoutProvider),
        probe: Arc::new(platform::AxPresentationProbe),
        registry: Arc::new(platform::NsWorkspaceRegistry),
        dispatcher: Arc::new(platform::MainQueueDispatcher),
    });

    let _preference_task = service.follow_preferences(preferences.subscribe());

    platform::workspace_monitor::install_scheduler(service.scheduler());
    if !platform::workspace_monitor::start() {
        tracing::warn!("Dock layout will only refresh at startup");
    }

    service.start();

    if let Err(err) = platform::event_tap::start(service.interceptor()) {
        let err = Click2HideError::from(err);
        tracing::error!(error = %err, "click hook unavailable, requesting Accessibility permission");
        if !platform::check_accessibility() {
            tracing::info!("grant Accessibility permission, then restart click2hide");
        }
    }

    tracing::info!("click2hide running");
    CFRunLoop::run_current();

    platform::workspace_monitor::uninstall_scheduler();
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run_daemon(
    _config: &Click2HideConfig,
    _preferences: &Arc<PreferenceStore>,
    _runtime: &tokio::runtime::Runtime,
) -> Result<(), Click2HideError> {
    Err(error::HookError::Unsupported.into())
}
