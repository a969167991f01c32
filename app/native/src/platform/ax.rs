//! Safe wrapper for the macOS Accessibility API (`AXUIElement`).
//!
//! Only the attributes needed to read the Dock's icon list and the frontmost
//! window's fullscreen state are exposed.
//!
//! # Thread Safety
//!
//! The Accessibility API is thread-safe for operations on different elements,
//! so `AXElement` is `Send` and `Sync`. Dock reads happen on tokio blocking
//! workers.

use std::cell::OnceCell;
use std::ffi::c_void;
use std::ptr;

use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::string::CFString;

use crate::dock::Rect;
use crate::error::IntrospectionError;

// ============================================================================
// FFI Declarations
// ============================================================================

type AXUIElementRef = *mut c_void;
type AXError = i32;

const K_AX_ERROR_SUCCESS: AXError = 0;
const K_AX_ERROR_API_DISABLED: AXError = -25211;
const K_AX_ERROR_NO_VALUE: AXError = -25212;

#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXUIElementCreateApplication(pid: i32) -> AXUIElementRef;
    fn AXUIElementCopyAttributeValue(
        element: AXUIElementRef,
        attribute: *const c_void,
        value: *mut *mut c_void,
    ) -> AXError;
    fn AXUIElementGetTypeID() -> u64;
    fn AXValueGetValue(value: *const c_void, value_type: i32, value_ptr: *mut c_void) -> bool;
}

#[link(name = "CoreFoundation", kind = "framework")]
unsafe extern "C" {
    fn CFGetTypeID(cf: *const c_void) -> u64;
    fn CFArrayGetCount(array: *const c_void) -> i64;
    fn CFArrayGetValueAtIndex(array: *const c_void, idx: i64) -> *const c_void;
    fn CFRelease(cf: *const c_void);
    fn CFRetain(cf: *const c_void) -> *const c_void;
}

// AXValue type constants
const K_AX_VALUE_TYPE_CG_POINT: i32 = 1;
const K_AX_VALUE_TYPE_CG_SIZE: i32 = 2;

// ============================================================================
// Cached CFStrings
// ============================================================================

thread_local! {
    static CF_CHILDREN: OnceCell<CFString> = const { OnceCell::new() };
    static CF_TITLE: OnceCell<CFString> = const { OnceCell::new() };
    static CF_ROLE: OnceCell<CFString> = const { OnceCell::new() };
    static CF_POSITION: OnceCell<CFString> = const { OnceCell::new() };
    static CF_SIZE: OnceCell<CFString> = const { OnceCell::new() };
    static CF_FOCUSED_WINDOW: OnceCell<CFString> = const { OnceCell::new() };
    static CF_FULLSCREEN: OnceCell<CFString> = const { OnceCell::new() };
}

/// Gets or creates a cached `CFString`.
macro_rules! cached_cfstring {
    ($cell:expr, $value:expr) => {
        $cell.with(|cell| cell.get_or_init(|| CFString::new($value)).as_concrete_TypeRef().cast())
    };
}

#[inline]
fn cf_children() -> *const c_void { cached_cfstring!(CF_CHILDREN, "AXChildren") }

#[inline]
fn cf_title() -> *const c_void { cached_cfstring!(CF_TITLE, "AXTitle") }

#[inline]
fn cf_role() -> *const c_void { cached_cfstring!(CF_ROLE, "AXRole") }

#[inline]
fn cf_position() -> *const c_void { cached_cfstring!(CF_POSITION, "AXPosition") }

#[inline]
fn cf_size() -> *const c_void { cached_cfstring!(CF_SIZE, "AXSize") }

#[inline]
fn cf_focused_window() -> *const c_void { cached_cfstring!(CF_FOCUSED_WINDOW, "AXFocusedWindow") }

#[inline]
fn cf_fullscreen() -> *const c_void { cached_cfstring!(CF_FULLSCREEN, "AXFullScreen") }

// ============================================================================
// AXElement
// ============================================================================

/// A safe wrapper around `AXUIElementRef`.
///
/// Owns one retain on the underlying element and releases it on drop.
pub struct AXElement {
    /// The underlying `AXUIElementRef`. Never null for a valid `AXElement`.
    raw: AXUIElementRef,
}

impl AXElement {
    /// Creates an `AXElement` for an application by its process ID.
    #[must_use]
    pub fn application(pid: i32) -> Option<Self> {
        let raw = unsafe { AXUIElementCreateApplication(pid) };
        if raw.is_null() { None } else { Some(Self { raw }) }
    }

    /// Gets the direct children of this element.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute cannot be read. A missing value is
    /// reported as no children.
    pub fn children(&self) -> Result<Vec<Self>, IntrospectionError> {
        let mut value: *mut c_void = ptr::null_mut();
        let result =
            unsafe { AXUIElementCopyAttributeValue(self.raw, cf_children(), &raw mut value) };

        if result == K_AX_ERROR_NO_VALUE {
            return Ok(Vec::new());
        }
        if result != K_AX_ERROR_SUCCESS {
            return Err(ax_result_to_error("AXChildren", result));
        }
        if value.is_null() {
            return Ok(Vec::new());
        }

        let count = unsafe { CFArrayGetCount(value) };
        let ax_type_id = unsafe { AXUIElementGetTypeID() };

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut children = Vec::with_capacity(count.max(0) as usize);

        for i in 0..count {
            let child = unsafe { CFArrayGetValueAtIndex(value, i) };
            if !child.is_null() && unsafe { CFGetTypeID(child) } == ax_type_id {
                // CFArrayGetValueAtIndex does not transfer ownership
                unsafe { CFRetain(child) };
                children.push(Self { raw: child.cast_mut() });
            }
        }

        unsafe { CFRelease(value) };
        Ok(children)
    }

    /// Gets the element's title.
    #[must_use]
    pub fn title(&self) -> Option<String> { unsafe { get_string_attr(self.raw, cf_title()) } }

    /// Gets the element's role (e.g., "`AXList`", "`AXDockItem`").
    #[must_use]
    pub fn role(&self) -> Option<String> { unsafe { get_string_attr(self.raw, cf_role()) } }

    /// Gets the focused window of this application element.
    #[must_use]
    pub fn focused_window(&self) -> Option<Self> {
        let mut value: *mut c_void = ptr::null_mut();
        let result =
            unsafe { AXUIElementCopyAttributeValue(self.raw, cf_focused_window(), &raw mut value) };

        if result != K_AX_ERROR_SUCCESS || value.is_null() {
            return None;
        }

        Some(Self { raw: value.cast() })
    }

    /// Returns whether this window is in fullscreen mode.
    #[must_use]
    pub fn is_fullscreen(&self) -> Option<bool> {
        unsafe { get_bool_attr(self.raw, cf_fullscreen()) }
    }

    /// Gets the frame (position and size) of this element.
    #[must_use]
    pub fn frame(&self) -> Option<Rect> {
        let (x, y) = unsafe { get_point_attr(self.raw, cf_position(), K_AX_VALUE_TYPE_CG_POINT) }?;
        let (width, height) = unsafe { get_point_attr(self.raw, cf_size(), K_AX_VALUE_TYPE_CG_SIZE) }?;
        Some(Rect::new(x, y, width, height))
    }
}

impl Drop for AXElement {
    fn drop(&mut self) {
        // SAFETY: self.raw is guaranteed to be valid and non-null
        unsafe { CFRelease(self.raw.cast()) };
    }
}

// SAFETY: The Accessibility API is thread-safe for operations on different elements.
unsafe impl Send for AXElement {}
unsafe impl Sync for AXElement {}

impl std::fmt::Debug for AXElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AXElement")
            .field("raw", &self.raw)
            .field("role", &self.role())
            .field("title", &self.title())
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Maps an `AXError` to an [`IntrospectionError`].
fn ax_result_to_error(what: &'static str, code: AXError) -> IntrospectionError {
    if code == K_AX_ERROR_API_DISABLED {
        IntrospectionError::NotTrusted
    } else {
        IntrospectionError::Accessibility { what, code }
    }
}

/// Gets a string attribute from an element.
unsafe fn get_string_attr(element: AXUIElementRef, attr: *const c_void) -> Option<String> {
    let mut value: *mut c_void = ptr::null_mut();
    let result = unsafe { AXUIElementCopyAttributeValue(element, attr, &raw mut value) };

    if result != K_AX_ERROR_SUCCESS || value.is_null() {
        return None;
    }

    let cf_string_type_id = CFString::type_id() as u64;
    if unsafe { CFGetTypeID(value) } != cf_string_type_id {
        unsafe { CFRelease(value) };
        return None;
    }

    // Create rule: the wrapper takes over the copied reference
    let cf_string = unsafe { CFString::wrap_under_create_rule(value.cast()) };
    Some(cf_string.to_string())
}

/// Gets a boolean attribute from an element.
unsafe fn get_bool_attr(element: AXUIElementRef, attr: *const c_void) -> Option<bool> {
    let mut value: *mut c_void = ptr::null_mut();
    let result = unsafe { AXUIElementCopyAttributeValue(element, attr, &raw mut value) };

    if result != K_AX_ERROR_SUCCESS || value.is_null() {
        return None;
    }

    let cf_bool_type_id = CFBoolean::type_id() as u64;
    if unsafe { CFGetTypeID(value) } != cf_bool_type_id {
        unsafe { CFRelease(value) };
        return None;
    }

    let bool_value = unsafe { CFBoolean::wrap_under_create_rule(value.cast()) };
    Some(bool_value.into())
}

/// Reads a `CGPoint` or `CGSize` `AXValue` attribute as a pair of floats.
unsafe fn get_point_attr(
    element: AXUIElementRef,
    attr: *const c_void,
    value_type: i32,
) -> Option<(f64, f64)> {
    let mut value: *mut c_void = ptr::null_mut();
    let result = unsafe { AXUIElementCopyAttributeValue(element, attr, &raw mut value) };

    if result != K_AX_ERROR_SUCCESS || value.is_null() {
        return None;
    }

    // CGPoint and CGSize share the same two-f64 layout
    let mut pair = core_graphics::geometry::CGPoint::new(0.0, 0.0);
    let success = unsafe { AXValueGetValue(value.cast(), value_type, (&raw mut pair).cast()) };

    unsafe { CFRelease(value) };

    success.then_some((pair.x, pair.y))
}
