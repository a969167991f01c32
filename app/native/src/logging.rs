//! Tracing subscriber setup for the daemon.

use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_LOG_FILTER;

/// Builds the log filter.
///
/// `RUST_LOG` wins when set and valid, then the configured `logLevel`, then
/// [`DEFAULT_LOG_FILTER`]. Invalid directives fall through to the next source.
#[must_use]
pub fn build_filter(env_directive: Option<&str>, configured: Option<&str>) -> EnvFilter {
    [env_directive, configured]
        .into_iter()
        .flatten()
        .filter(|directive| !directive.trim().is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global fmt subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init(configured: Option<&str>) {
    let env_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env_directive.as_deref(), configured);

    let installed = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init().is_ok();

    if installed {
        tracing::debug!("logging initialized");
    }
}
