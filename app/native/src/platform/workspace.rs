//! `NSWorkspace`-backed process registry.
//!
//! Lookups enumerate `NSWorkspace.runningApplications` and read each
//! `NSRunningApplication`'s localized name, frontmost and hidden state.
//! Control requests re-resolve the application by pid right before acting so
//! a stale handle is never messaged.

use objc::rc::autoreleasepool;
use objc::runtime::{BOOL, NO, Object};
use objc::{class, msg_send, sel, sel_impl};

use super::objc::{nsstring, nsstring_to_string};
use crate::activation::{ProcessRegistry, RunningApp};
use crate::constants::dock::DOCK_BUNDLE_ID;
use crate::error::ActivationError;

/// `NSApplicationActivateIgnoringOtherApps`.
const ACTIVATE_IGNORING_OTHER_APPS: usize = 1 << 1;

/// [`ProcessRegistry`] backed by `NSWorkspace` and `NSRunningApplication`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NsWorkspaceRegistry;

impl ProcessRegistry for NsWorkspaceRegistry {
    fn find_by_names(&self, names: &[&str]) -> Option<RunningApp> {
        autoreleasepool(|| unsafe {
            for_each_running_app(|app| {
                let name = nsstring_to_string(msg_send![app, localizedName]);
                if !names.contains(&name.as_str()) {
                    return None;
                }

                let pid: i32 = msg_send![app, processIdentifier];
                let is_active: BOOL = msg_send![app, isActive];
                let is_hidden: BOOL = msg_send![app, isHidden];

                Some(RunningApp {
                    pid,
                    name,
                    is_active: is_active != NO,
                    is_hidden: is_hidden != NO,
                })
            })
        })
    }

    fn running_names(&self) -> Vec<String> {
        autoreleasepool(|| unsafe {
            let mut names = Vec::new();
            for_each_running_app::<()>(|app| {
                let name = nsstring_to_string(msg_send![app, localizedName]);
                names.push(if name.is_empty() { "Unknown".to_string() } else { name });
                None
            });
            names
        })
    }

    fn launch_or_activate(&self, name: &str) -> Result<(), ActivationError> {
        let launched = autoreleasepool(|| unsafe {
            let workspace: *mut Object = msg_send![class!(NSWorkspace), sharedWorkspace];
            let app_name = nsstring(name);
            let ok: BOOL = msg_send![workspace, launchApplication: app_name];
            ok != NO
        });

        if launched {
            Ok(())
        } else {
            Err(ActivationError::Launch { name: name.to_string() })
        }
    }

    fn unhide(&self, app: &RunningApp) -> Result<(), ActivationError> {
        send_to_app(app, "unhide", |running| unsafe { msg_send![running, unhide] })
    }

    fn activate(&self, app: &RunningApp) -> Result<(), ActivationError> {
        send_to_app(app, "activate", |running| unsafe {
            msg_send![running, activateWithOptions: ACTIVATE_IGNORING_OTHER_APPS]
        })
    }

    fn hide(&self, app: &RunningApp) -> Result<(), ActivationError> {
        send_to_app(app, "hide", |running| unsafe { msg_send![running, hide] })
    }
}

/// Returns the pid of the Dock process, if it is running.
#[must_use]
pub fn dock_pid() -> Option<i32> {
    autoreleasepool(|| unsafe {
        for_each_running_app(|app| {
            let bundle_id: *mut Object = msg_send![app, bundleIdentifier];
            (nsstring_to_string(bundle_id) == DOCK_BUNDLE_ID).then(|| msg_send![app, processIdentifier])
        })
    })
}

/// Returns the pid of the frontmost application, if any.
#[must_use]
pub fn frontmost_pid() -> Option<i32> {
    autoreleasepool(|| unsafe {
        let workspace: *mut Object = msg_send![class!(NSWorkspace), sharedWorkspace];
        let app: *mut Object = msg_send![workspace, frontmostApplication];
        if app.is_null() {
            return None;
        }
        let pid: i32 = msg_send![app, processIdentifier];
        (pid > 0).then_some(pid)
    })
}

/// Walks `runningApplications` until `visit` returns `Some`.
///
/// Callers wrap this in an autorelease pool; the array and its elements are
/// autoreleased.
fn for_each_running_app<T>(mut visit: impl FnMut(*mut Object) -> Option<T>) -> Option<T> {
    unsafe {
        let workspace: *mut Object = msg_send![class!(NSWorkspace), sharedWorkspace];
        let running_apps: *mut Object = msg_send![workspace, runningApplications];
        if running_apps.is_null() {
            return None;
        }

        let count: usize = msg_send![running_apps, count];
        for i in 0..count {
            let app: *mut Object = msg_send![running_apps, objectAtIndex: i];
            if app.is_null() {
                continue;
            }
            if let Some(found) = visit(app) {
                return Some(found);
            }
        }
    }

    None
}

/// Looks `app` up by pid and sends it a `BOOL`-returning message.
fn send_to_app(
    app: &RunningApp,
    step: &'static str,
    send: impl FnOnce(*mut Object) -> BOOL,
) -> Result<(), ActivationError> {
    let ok = autoreleasepool(|| unsafe {
        let running: *mut Object = msg_send![
            class!(NSRunningApplication),
            runningApplicationWithProcessIdentifier: app.pid
        ];
        if running.is_null() {
            return None;
        }
        Some(send(running) != NO)
    });

    match ok {
        Some(true) => Ok(()),
        Some(false) => Err(ActivationError::Refused { step, name: app.name.clone() }),
        None => Err(ActivationError::NotRunning(app.name.clone())),
    }
}
