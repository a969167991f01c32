//! Accessibility permission checks.
//!
//! Both the event tap and Dock introspection need the process to be trusted
//! for Accessibility (System Settings > Privacy & Security > Accessibility).

use std::ffi::c_void;

use core_foundation::base::{CFType, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;

#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn AXIsProcessTrustedWithOptions(options: *const c_void) -> bool;
}

// Key for prompting the user for accessibility permissions
const K_AX_TRUSTED_CHECK_OPTION_PROMPT: &str = "AXTrustedCheckOptionPrompt";

/// Returns whether the process is trusted for Accessibility, without prompting.
#[must_use]
pub fn is_trusted() -> bool { unsafe { AXIsProcessTrusted() } }

/// Checks trust and, if missing, shows the system permission prompt.
///
/// # Returns
///
/// `true` if permission is already granted. After the user grants it the
/// daemon usually has to be restarted before the event tap can be created.
#[must_use]
pub fn check_and_prompt() -> bool {
    let options = prompt_options();
    unsafe { AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef().cast()) }
}

/// `{ AXTrustedCheckOptionPrompt: true }`
fn prompt_options() -> CFDictionary<CFType, CFType> {
    let key = CFString::new(K_AX_TRUSTED_CHECK_OPTION_PROMPT);
    let value = CFBoolean::true_value();
    CFDictionary::from_CFType_pairs(&[(key.as_CFType(), value.as_CFType())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_options_request_the_dialog() {
        let options = prompt_options();
        assert_eq!(options.len(), 1);

        let key = CFString::new(K_AX_TRUSTED_CHECK_OPTION_PROMPT).as_CFType();
        let value = options.find(&key).and_then(|value| value.downcast::<CFBoolean>());
        assert_eq!(value.map(bool::from), Some(true));
    }
}
