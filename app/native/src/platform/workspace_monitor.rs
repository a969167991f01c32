//! `NSWorkspace` notifications as Dock refresh triggers.
//!
//! ```text
//! NSWorkspace notification center (main thread)
//!         │  launch / activate / deactivate / terminate / space change
//!         ▼
//! Click2HideWorkspaceObserver (Objective-C class)
//!         │  RefreshTrigger
//!         ▼
//! installed RefreshScheduler ──▶ tokio blocking worker ──▶ DockCache
//! ```
//!
//! The observer callbacks only call `RefreshScheduler::trigger`, which is a
//! single compare-and-swap plus a task spawn, so the main thread is never
//! held up by Dock introspection.

use std::sync::OnceLock;

use objc::declare::ClassDecl;
use objc::runtime::{Class, Object, Sel};
use objc::{class, msg_send, sel, sel_impl};
use parking_lot::RwLock;

use super::objc::{nsstring, nsstring_to_string};
use crate::dock::{RefreshScheduler, RefreshTrigger};

const OBSERVER_CLASS_NAME: &str = "Click2HideWorkspaceObserver";

/// Notification names paired with the observer selector that handles them.
const NOTIFICATIONS: &[(&str, RefreshTrigger)] = &[
    ("NSWorkspaceDidLaunchApplicationNotification", RefreshTrigger::AppLaunched),
    ("NSWorkspaceDidActivateApplicationNotification", RefreshTrigger::AppActivated),
    ("NSWorkspaceDidDeactivateApplicationNotification", RefreshTrigger::AppDeactivated),
    ("NSWorkspaceDidTerminateApplicationNotification", RefreshTrigger::AppTerminated),
    ("NSWorkspaceActiveSpaceDidChangeNotification", RefreshTrigger::SpaceChanged),
];

// ============================================================================
// Installed Scheduler
// ============================================================================

static SCHEDULER: OnceLock<RwLock<Option<RefreshScheduler>>> = OnceLock::new();

fn scheduler_slot() -> &'static RwLock<Option<RefreshScheduler>> { SCHEDULER.get_or_init(|| RwLock::new(None)) }

/// Installs the scheduler that observer callbacks trigger.
pub fn install_scheduler(scheduler: RefreshScheduler) { *scheduler_slot().write() = Some(scheduler); }

/// Removes the installed scheduler; later notifications are ignored.
pub fn uninstall_scheduler() { *scheduler_slot().write() = None; }

fn trigger(reason: RefreshTrigger, notification: *mut Object) {
    if tracing::enabled!(tracing::Level::TRACE) {
        tracing::trace!(trigger = reason.as_str(), app = %notification_app_name(notification), "workspace notification");
    }

    if let Some(scheduler) = scheduler_slot().read().as_ref() {
        scheduler.trigger(reason);
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Registers the workspace observer for every refresh-triggering notification.
///
/// Must be called on the main thread, before the main run loop starts.
///
/// # Returns
///
/// `true` if the observer was registered.
pub fn start() -> bool {
    unsafe {
        let workspace: *mut Object = msg_send![class!(NSWorkspace), sharedWorkspace];
        if workspace.is_null() {
            tracing::error!("failed to get shared workspace");
            return false;
        }

        let notification_center: *mut Object = msg_send![workspace, notificationCenter];
        if notification_center.is_null() {
            tracing::error!("failed to get workspace notification center");
            return false;
        }

        let Some(observer) = create_workspace_observer() else {
            tracing::error!("failed to create workspace observer");
            return false;
        };

        for (name, reason) in NOTIFICATIONS {
            let notification_name = nsstring(name);
            let _: () = msg_send![
                notification_center,
                addObserver: observer
                selector: selector_for(*reason)
                name: notification_name
                object: std::ptr::null::<Object>()
            ];
        }
    }

    tracing::debug!(count = NOTIFICATIONS.len(), "workspace observer registered");
    true
}

fn selector_for(reason: RefreshTrigger) -> Sel {
    match reason {
        RefreshTrigger::AppLaunched => sel!(handleAppLaunch:),
        RefreshTrigger::AppActivated => sel!(handleAppActivate:),
        RefreshTrigger::AppDeactivated => sel!(handleAppDeactivate:),
        RefreshTrigger::AppTerminated => sel!(handleAppTerminate:),
        RefreshTrigger::SpaceChanged | RefreshTrigger::Startup => sel!(handleSpaceChange:),
    }
}

// ============================================================================
// Objective-C Observer
// ============================================================================

/// Creates an instance of the observer class, declaring it on first use.
///
/// # Safety
///
/// Must be called within a valid Objective-C runtime context. The returned
/// object is intentionally never released; the notification center keeps
/// sending to it for the life of the process.
unsafe fn create_workspace_observer() -> Option<*mut Object> {
    let observer_class = match Class::get(OBSERVER_CLASS_NAME) {
        Some(existing) => existing,
        None => {
            let mut decl = ClassDecl::new(OBSERVER_CLASS_NAME, class!(NSObject))?;
            unsafe {
                decl.add_method(
                    sel!(handleAppLaunch:),
                    handle_app_launch as extern "C" fn(&Object, Sel, *mut Object),
                );
                decl.add_method(
                    sel!(handleAppActivate:),
                    handle_app_activate as extern "C" fn(&Object, Sel, *mut Object),
                );
                decl.add_method(
                    sel!(handleAppDeactivate:),
                    handle_app_deactivate as extern "C" fn(&Object, Sel, *mut Object),
                );
                decl.add_method(
                    sel!(handleAppTerminate:),
                    handle_app_terminate as extern "C" fn(&Object, Sel, *mut Object),
                );
                decl.add_method(
                    sel!(handleSpaceChange:),
                    handle_space_change as extern "C" fn(&Object, Sel, *mut Object),
                );
            }
            decl.register()
        }
    };

    let instance: *mut Object = unsafe { msg_send![observer_class, alloc] };
    let instance: *mut Object = unsafe { msg_send![instance, init] };
    (!instance.is_null()).then_some(instance)
}

extern "C" fn handle_app_launch(_self: &Object, _cmd: Sel, notification: *mut Object) {
    trigger(RefreshTrigger::AppLaunched, notification);
}

extern "C" fn handle_app_activate(_self: &Object, _cmd: Sel, notification: *mut Object) {
    trigger(RefreshTrigger::AppActivated, notification);
}

extern "C" fn handle_app_deactivate(_self: &Object, _cmd: Sel, notification: *mut Object) {
    trigger(RefreshTrigger::AppDeactivated, notification);
}

extern "C" fn handle_app_terminate(_self: &Object, _cmd: Sel, notification: *mut Object) {
    trigger(RefreshTrigger::AppTerminated, notification);
}

extern "C" fn handle_space_change(_self: &Object, _cmd: Sel, notification: *mut Object) {
    trigger(RefreshTrigger::SpaceChanged, notification);
}

/// Reads the application name carried by a workspace notification, if any.
fn notification_app_name(notification: *mut Object) -> String {
    if notification.is_null() {
        return String::new();
    }

    unsafe {
        let user_info: *mut Object = msg_send![notification, userInfo];
        if user_info.is_null() {
            return String::new();
        }

        let app_key = nsstring("NSWorkspaceApplicationKey");
        let running_app: *mut Object = msg_send![user_info, objectForKey: app_key];
        if running_app.is_null() {
            return String::new();
        }

        nsstring_to_string(msg_send![running_app, localizedName])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_trigger_has_a_distinct_selector() {
        let selectors: Vec<Sel> = NOTIFICATIONS.iter().map(|(_, reason)| selector_for(*reason)).collect();
        for (i, a) in selectors.iter().enumerate() {
            for b in &selectors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_trigger_without_scheduler_is_noop() {
        uninstall_scheduler();
        trigger(RefreshTrigger::AppLaunched, std::ptr::null_mut());
    }
}
