//! Accessibility-backed Dock layout and fullscreen detection.

use super::accessibility;
use super::ax::AXElement;
use super::workspace::{dock_pid, frontmost_pid};
use crate::dock::{IconLayoutProvider, IconRecord, PresentationProbe, non_empty, retain_clickable};
use crate::error::IntrospectionError;

/// Role of the Dock element that holds the icons.
const DOCK_LIST_ROLE: &str = "AXList";

/// Reads icon frames and titles from the Dock's `AXList`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxDockLayoutProvider;

impl IconLayoutProvider for AxDockLayoutProvider {
    fn resolve(&self) -> Result<Vec<IconRecord>, IntrospectionError> {
        if !accessibility::is_trusted() {
            return Err(IntrospectionError::NotTrusted);
        }

        let pid = dock_pid().ok_or(IntrospectionError::DockNotRunning)?;
        let dock = AXElement::application(pid).ok_or(IntrospectionError::DockNotRunning)?;

        // The Dock exposes a single AXList holding every item, including
        // separators and the Downloads/Trash stacks.
        let Some(list) = dock
            .children()?
            .into_iter()
            .find(|child| child.role().as_deref() == Some(DOCK_LIST_ROLE))
        else {
            return Err(IntrospectionError::Empty);
        };

        let icons = list
            .children()?
            .iter()
            .filter_map(|item| {
                let rect = item.frame()?;
                let title = item.title().unwrap_or_default();
                Some(IconRecord::new(rect, title))
            })
            .collect();

        non_empty(retain_clickable(icons))
    }
}

/// Reports whether the frontmost application's focused window is fullscreen.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxPresentationProbe;

impl PresentationProbe for AxPresentationProbe {
    fn foreground_is_exclusive(&self) -> bool {
        frontmost_pid()
            .and_then(AXElement::application)
            .and_then(|app| app.focused_window())
            .and_then(|window| window.is_fullscreen())
            .unwrap_or(false)
    }
}
