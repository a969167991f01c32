//! Objective-C helpers for `NSString` conversion.

use std::ffi::c_void;

use objc::runtime::Object;
use objc::{class, msg_send, sel, sel_impl};

/// Creates an autoreleased `NSString` from a Rust string slice.
///
/// # Safety
///
/// Calls Objective-C methods via FFI; the caller must be inside an
/// autorelease pool if the result outlives the current run loop turn.
#[must_use]
pub unsafe fn nsstring(s: &str) -> *mut Object {
    let nsstring_class = class!(NSString);
    let bytes = s.as_ptr().cast::<c_void>();
    let len = s.len();
    let encoding: usize = 4; // NSUTF8StringEncoding

    unsafe {
        msg_send![
            nsstring_class,
            stringWithBytes: bytes
            length: len
            encoding: encoding
        ]
    }
}

/// Converts an `NSString` to a Rust `String`.
///
/// Returns an empty string if the input is null or conversion fails.
///
/// # Safety
///
/// `nsstring` must be null or a valid `NSString` pointer.
#[must_use]
pub unsafe fn nsstring_to_string(nsstring: *mut Object) -> String {
    if nsstring.is_null() {
        return String::new();
    }

    let c_str: *const std::ffi::c_char = unsafe { msg_send![nsstring, UTF8String] };
    if c_str.is_null() {
        return String::new();
    }

    // SAFETY: c_str is verified non-null above, and UTF8String returns a valid C string
    unsafe { std::ffi::CStr::from_ptr(c_str) }.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nsstring_round_trip() {
        let value = unsafe { nsstring_to_string(nsstring("Visual Studio Code")) };
        assert_eq!(value, "Visual Studio Code");
    }

    #[test]
    fn test_null_nsstring_is_empty() {
        assert!(unsafe { nsstring_to_string(std::ptr::null_mut()) }.is_empty());
    }
}
