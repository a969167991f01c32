//! Global left-mouse-down hook.
//!
//! The tap runs on its own thread with its own `CFRunLoop`. The callback finds
//! the [`ClickInterceptor`] through a thread-local slot owned by that thread,
//! so no untyped context pointer crosses the FFI boundary.

use std::cell::RefCell;
use std::ffi::c_void;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use core_foundation::base::TCFType;
use core_foundation::mach_port::CFMachPort;
use core_foundation::runloop::{CFRunLoop, kCFRunLoopCommonModes};
use core_graphics::geometry::CGPoint;

use crate::dock::Point;
use crate::error::HookError;
use crate::interceptor::{ClickDisposition, ClickInterceptor};
use crate::utils::thread::spawn_named_thread;

// FFI declarations for Core Graphics event tap functions
type CGEventRef = *mut c_void;
type CGEventTapProxy = *mut c_void;
type CFMachPortRef = *mut c_void;

type CGEventTapCallBack = extern "C" fn(
    proxy: CGEventTapProxy,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef;

#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C" {
    fn CGEventTapCreate(
        tap: u32,
        place: u32,
        options: u32,
        events_of_interest: u64,
        callback: CGEventTapCallBack,
        user_info: *mut c_void,
    ) -> CFMachPortRef;

    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
    fn CGEventGetLocation(event: CGEventRef) -> CGPoint;
}

const K_CG_SESSION_EVENT_TAP: u32 = 1;
const K_CG_HEAD_INSERT_EVENT_TAP: u32 = 0;
const K_CG_EVENT_TAP_OPTION_DEFAULT: u32 = 0;

const K_CG_EVENT_LEFT_MOUSE_DOWN: u32 = 1;
const K_CG_EVENT_TAP_DISABLED_BY_TIMEOUT: u32 = 0xFFFF_FFFE;
const K_CG_EVENT_TAP_DISABLED_BY_USER_INPUT: u32 = 0xFFFF_FFFF;

/// How long [`start`] waits for the tap thread to report whether the tap
/// was created.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

struct TapState {
    interceptor: Arc<ClickInterceptor>,
    port: CFMachPortRef,
}

thread_local! {
    static TAP_STATE: RefCell<Option<TapState>> = const { RefCell::new(None) };
}

/// Installs the click hook on a dedicated thread.
///
/// Blocks until the tap thread reports whether the tap could be created.
///
/// # Errors
///
/// Returns [`HookError::TapCreation`] when macOS refuses the tap (usually a
/// missing Accessibility grant) and [`HookError::RunLoopSource`] when the run
/// loop source cannot be created. [`HookError::Thread`] means the tap thread
/// itself could not be started.
pub fn start(interceptor: Arc<ClickInterceptor>) -> Result<(), HookError> {
    let (ready_tx, ready_rx) = mpsc::channel();

    // Detached: the thread lives as long as its run loop.
    let _tap_thread = spawn_named_thread("event-tap", move || {
        let installed = install(interceptor);
        let ok = installed.is_ok();
        let _ = ready_tx.send(installed);
        if !ok {
            return;
        }

        CFRunLoop::run_current();
        TAP_STATE.with(|state| state.borrow_mut().take());
        tracing::debug!("event tap run loop exited");
    })?;

    ready_rx.recv_timeout(STARTUP_TIMEOUT).unwrap_or(Err(HookError::TapCreation))
}

/// Creates the tap and attaches it to the current thread's run loop.
fn install(interceptor: Arc<ClickInterceptor>) -> Result<(), HookError> {
    let event_mask = 1u64 << K_CG_EVENT_LEFT_MOUSE_DOWN;

    let tap = unsafe {
        CGEventTapCreate(
            K_CG_SESSION_EVENT_TAP,
            K_CG_HEAD_INSERT_EVENT_TAP,
            K_CG_EVENT_TAP_OPTION_DEFAULT,
            event_mask,
            event_tap_callback,
            std::ptr::null_mut(),
        )
    };

    if tap.is_null() {
        return Err(HookError::TapCreation);
    }

    let tap_port = unsafe { CFMachPort::wrap_under_create_rule(tap.cast()) };
    let run_loop_source = tap_port.create_runloop_source(0).map_err(|()| HookError::RunLoopSource)?;

    TAP_STATE.with(|state| {
        *state.borrow_mut() = Some(TapState { interceptor, port: tap });
    });

    CFRunLoop::get_current().add_source(&run_loop_source, unsafe { kCFRunLoopCommonModes });
    unsafe { CGEventTapEnable(tap, true) };

    // The run loop source retains the port; keep ours alive for the thread.
    std::mem::forget(tap_port);

    tracing::info!("click hook installed");
    Ok(())
}

/// Callback for every event delivered to the tap.
///
/// Returning null drops the event; returning `event` lets it through.
extern "C" fn event_tap_callback(
    _proxy: CGEventTapProxy,
    event_type: u32,
    event: CGEventRef,
    _user_info: *mut c_void,
) -> CGEventRef {
    match event_type {
        K_CG_EVENT_TAP_DISABLED_BY_TIMEOUT | K_CG_EVENT_TAP_DISABLED_BY_USER_INPUT => {
            reenable(event_type);
            event
        }
        K_CG_EVENT_LEFT_MOUSE_DOWN if !event.is_null() => {
            let location = unsafe { CGEventGetLocation(event) };
            match dispatch(Point::new(location.x, location.y)) {
                ClickDisposition::Suppress => std::ptr::null_mut(),
                ClickDisposition::PassThrough => event,
            }
        }
        _ => event,
    }
}

fn dispatch(location: Point) -> ClickDisposition {
    TAP_STATE.with(|state| {
        state
            .try_borrow()
            .ok()
            .and_then(|slot| slot.as_ref().map(|tap| Arc::clone(&tap.interceptor)))
            .map_or(ClickDisposition::PassThrough, |interceptor| interceptor.handle_click(location))
    })
}

fn reenable(event_type: u32) {
    let reason = if event_type == K_CG_EVENT_TAP_DISABLED_BY_TIMEOUT { "timeout" } else { "user input" };
    tracing::warn!(reason, "click hook disabled by the system, re-enabling");

    TAP_STATE.with(|state| {
        if let Ok(slot) = state.try_borrow()
            && let Some(tap) = slot.as_ref()
        {
            unsafe { CGEventTapEnable(tap.port, true) };
        }
    });
}
