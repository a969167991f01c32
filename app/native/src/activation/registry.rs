//! Running-application lookup and process control.

use crate::error::ActivationError;

/// A running application as seen at resolve time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningApp {
    /// Process identifier.
    pub pid: i32,
    /// Localized application name.
    pub name: String,
    /// Whether the application is frontmost.
    pub is_active: bool,
    /// Whether the application is hidden.
    pub is_hidden: bool,
}

/// Access to the set of running applications.
///
/// The macOS implementation is backed by `NSWorkspace` and
/// `NSRunningApplication`. Control methods are only invoked from the main
/// thread in the daemon; lookups may run on any thread.
pub trait ProcessRegistry: Send + Sync {
    /// Returns the first running application whose localized name equals any
    /// of `names`, in running-application order.
    fn find_by_names(&self, names: &[&str]) -> Option<RunningApp>;

    /// Returns the localized names of every running application.
    fn running_names(&self) -> Vec<String>;

    /// Launches the application called `name`, or activates it if it is
    /// already running. This is the only reliable way to bring back a
    /// minimized application.
    ///
    /// # Errors
    ///
    /// Returns an error if the application could not be found or launched.
    fn launch_or_activate(&self, name: &str) -> Result<(), ActivationError>;

    /// Unhides `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request was refused.
    fn unhide(&self, app: &RunningApp) -> Result<(), ActivationError>;

    /// Brings `app` to the foreground.
    ///
    /// # Errors
    ///
    /// Returns an error if the request was refused.
    fn activate(&self, app: &RunningApp) -> Result<(), ActivationError>;

    /// Hides `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request was refused.
    fn hide(&self, app: &RunningApp) -> Result<(), ActivationError>;
}
