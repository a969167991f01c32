//! Main-thread dispatch through Grand Central Dispatch.
//!
//! `NSRunningApplication` hide/unhide/activate and
//! `NSWorkspace.launchApplication` are `AppKit` calls and belong on the main
//! thread. The event tap hands resolved actions to [`MainQueueDispatcher`],
//! which returns immediately so the tap callback stays fast.

use std::ffi::c_void;

use crate::interceptor::ActionDispatcher;

/// Dispatch queue type alias.
type DispatchQueue = *const c_void;

#[link(name = "System", kind = "dylib")]
unsafe extern "C" {
    /// The main dispatch queue (this is the actual symbol, not the macro).
    static _dispatch_main_q: c_void;
    fn dispatch_async_f(
        queue: DispatchQueue,
        context: *mut c_void,
        work: extern "C" fn(*mut c_void),
    );
}

/// Returns the main dispatch queue.
///
/// Equivalent to the `dispatch_get_main_queue()` macro.
fn get_main_queue() -> DispatchQueue { std::ptr::addr_of!(_dispatch_main_q) }

/// Context for dispatching a closure to the main thread.
struct DispatchContext<F: FnOnce() + Send + 'static> {
    closure: Option<F>,
}

/// C-compatible trampoline function that executes the closure.
extern "C" fn dispatch_trampoline<F: FnOnce() + Send + 'static>(context: *mut c_void) {
    unsafe {
        let ctx = Box::from_raw(context.cast::<DispatchContext<F>>());
        if let Some(closure) = ctx.closure {
            closure();
        }
    }
}

/// Dispatches a closure to run on the main thread asynchronously.
///
/// Safe to call from any thread. The closure runs the next time the main
/// run loop services the main queue.
pub fn dispatch_on_main<F>(closure: F)
where F: FnOnce() + Send + 'static {
    let ctx = Box::new(DispatchContext { closure: Some(closure) });
    let ctx_ptr = Box::into_raw(ctx).cast::<c_void>();

    unsafe {
        dispatch_async_f(get_main_queue(), ctx_ptr, dispatch_trampoline::<F>);
    }
}

/// [`ActionDispatcher`] that runs jobs on the main queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainQueueDispatcher;

impl ActionDispatcher for MainQueueDispatcher {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send + 'static>) { dispatch_on_main(job); }
}
