//! macOS platform layer.
//!
//! - [`accessibility`] - Accessibility trust check and prompt
//! - [`ax`] - `AXUIElement` wrapper
//! - [`dispatch`] - main-queue action dispatcher
//! - [`dock_layout`] - Dock icon layout and fullscreen probe
//! - [`event_tap`] - global left-click hook
//! - [`workspace`] - `NSWorkspace` process registry
//! - [`workspace_monitor`] - `NSWorkspace` notifications as refresh triggers

pub mod accessibility;
pub mod ax;
pub mod dispatch;
pub mod dock_layout;
pub mod event_tap;
pub mod objc;
pub mod workspace;
pub mod workspace_monitor;

pub use accessibility::{check_and_prompt as check_accessibility, is_trusted as has_accessibility};
pub use dispatch::MainQueueDispatcher;
pub use dock_layout::{AxDockLayoutProvider, AxPresentationProbe};
pub use workspace::NsWorkspaceRegistry;
