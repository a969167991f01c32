//! Seams between the platform-free pipeline and the desktop shell.
//!
//! The macOS implementations live in `platform::dock_layout`; tests plug in
//! in-memory fakes.

use super::snapshot::IconRecord;
use crate::error::IntrospectionError;

/// Resolves the current Dock icon layout.
///
/// Implementations are pure queries: they hold no snapshot state of their own
/// and may block for tens of milliseconds. They are never called from the
/// click path.
pub trait IconLayoutProvider: Send + Sync {
    /// Enumerates the Dock's icons.
    ///
    /// # Errors
    ///
    /// Returns an error when the Dock is not running, when Accessibility
    /// permission is missing, when an Accessibility call fails, or when the
    /// Dock reports no icons at all.
    fn resolve(&self) -> Result<Vec<IconRecord>, IntrospectionError>;
}

/// Reports whether the foreground application is in an exclusive
/// (fullscreen) presentation.
pub trait PresentationProbe: Send + Sync {
    fn foreground_is_exclusive(&self) -> bool;
}

/// Probe for platforms or tests with no fullscreen concept.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverExclusive;

impl PresentationProbe for NeverExclusive {
    fn foreground_is_exclusive(&self) -> bool { false }
}

/// Drops records that do not describe a clickable application icon.
///
/// Separators and spacers come back from the Dock with an empty title or a
/// zero-sized frame.
#[must_use]
pub fn retain_clickable(icons: Vec<IconRecord>) -> Vec<IconRecord> {
    icons
        .into_iter()
        .filter(|icon| !icon.identity.trim().is_empty() && icon.rect.is_valid())
        .collect()
}

/// Applies the "empty means unknown" rule to a filtered icon batch.
///
/// # Errors
///
/// Returns [`IntrospectionError::Empty`] when no clickable icons remain.
pub fn non_empty(icons: Vec<IconRecord>) -> Result<Vec<IconRecord>, IntrospectionError> {
    if icons.is_empty() { Err(IntrospectionError::Empty) } else { Ok(icons) }
}
