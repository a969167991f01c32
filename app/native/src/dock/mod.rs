//! Dock layout: icon geometry, the published snapshot, and the refresh
//! pipeline that keeps it current.

mod cache;
pub mod geometry;
mod layout;
mod scheduler;
mod snapshot;

pub use cache::DockCache;
pub use geometry::{Point, Rect};
pub use layout::{IconLayoutProvider, NeverExclusive, PresentationProbe, non_empty, retain_clickable};
pub use scheduler::{RefreshScheduler, RefreshTrigger};
pub use snapshot::{DockSnapshot, IconRecord};
