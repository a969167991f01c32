use std::io;
use std::thread::{self, JoinHandle};

use crate::constants::THREAD_PREFIX;

/// Formats the OS thread name for a daemon thread.
fn thread_name(role: &str) -> String { format!("{THREAD_PREFIX}-{role}") }

/// Starts a named OS thread for `role`, e.g. `click2hide-event-tap`.
///
/// # Errors
///
/// Returns the OS error if the thread could not be created.
pub fn spawn_named_thread<F>(role: &str, task: F) -> io::Result<JoinHandle<()>>
where F: FnOnce() + Send + 'static {
    thread::Builder::new().name(thread_name(role)).spawn(task)
}
