//! Dock icon records and the immutable snapshot the click path reads.

use std::cmp::Ordering;

use serde::Serialize;

use super::geometry::{Point, Rect};

/// A single Dock icon: where it is on screen and what it represents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IconRecord {
    /// Frame of the icon in global screen coordinates.
    pub rect: Rect,
    /// Display name the Dock reports for the icon.
    pub identity: String,
}

impl IconRecord {
    /// Create a new icon record.
    #[must_use]
    pub fn new(rect: Rect, identity: impl Into<String>) -> Self {
        Self { rect, identity: identity.into() }
    }

    fn layout_order(&self, other: &Self) -> Ordering {
        self.identity
            .cmp(&other.identity)
            .then_with(|| self.rect.x.total_cmp(&other.rect.x))
            .then_with(|| self.rect.y.total_cmp(&other.rect.y))
            .then_with(|| self.rect.width.total_cmp(&other.rect.width))
            .then_with(|| self.rect.height.total_cmp(&other.rect.height))
    }
}

/// A complete, immutable set of Dock icons.
///
/// Snapshots are never edited in place: every refresh builds a new one and the
/// [`DockCache`](super::DockCache) swaps it in whole.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DockSnapshot {
    /// Publication sequence number (0 for the initial empty snapshot).
    pub generation: u64,
    /// Icons in the order the Dock enumerated them.
    pub icons: Vec<IconRecord>,
}

impl DockSnapshot {
    /// Create a snapshot with the given generation and icons.
    #[must_use]
    pub const fn new(generation: u64, icons: Vec<IconRecord>) -> Self { Self { generation, icons } }

    /// Returns the number of icons in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize { self.icons.len() }

    /// Returns whether the snapshot holds no icons.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.icons.is_empty() }

    /// Finds the icon under `point`.
    ///
    /// Icons are scanned in enumeration order and the first match wins, which
    /// keeps the result deterministic even if two frames ever overlap.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&IconRecord> {
        self.icons.iter().find(|icon| icon.rect.contains(point))
    }

    /// Compares icon content with another snapshot, ignoring order and generation.
    #[must_use]
    pub fn same_layout(&self, other: &Self) -> bool { self.has_icons(&other.icons) }

    /// Compares icon content with an unpublished batch, ignoring order.
    #[must_use]
    pub fn has_icons(&self, icons: &[IconRecord]) -> bool {
        if self.icons.len() != icons.len() {
            return false;
        }

        let mut ours: Vec<&IconRecord> = self.icons.iter().collect();
        let mut theirs: Vec<&IconRecord> = icons.iter().collect();
        ours.sort_by(|a, b| a.layout_order(b));
        theirs.sort_by(|a, b| a.layout_order(b));

        ours == theirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(x: f64, name: &str) -> IconRecord { IconRecord::new(Rect::new(x, 0.0, 50.0, 50.0), name) }

    #[test]
    fn test_hit_test_finds_icon() {
        let snapshot = DockSnapshot::new(1, vec![icon(0.0, "Finder"), icon(50.0, "Mail")]);
        let hit = snapshot.hit_test(Point::new(75.0, 25.0));
        assert_eq!(hit.map(|i| i.identity.as_str()), Some("Mail"));
    }

    #[test]
    fn test_hit_test_misses_outside() {
        let snapshot = DockSnapshot::new(1, vec![icon(0.0, "Finder")]);
        assert!(snapshot.hit_test(Point::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_hit_test_first_match_wins_on_overlap() {
        let snapshot = DockSnapshot::new(
            1,
            vec![
                IconRecord::new(Rect::new(0.0, 0.0, 60.0, 50.0), "Notes"),
                IconRecord::new(Rect::new(40.0, 0.0, 60.0, 50.0), "Mail"),
            ],
        );
        let hit = snapshot.hit_test(Point::new(50.0, 10.0));
        assert_eq!(hit.map(|i| i.identity.as_str()), Some("Notes"));
    }

    #[test]
    fn test_same_layout_ignores_order_and_generation() {
        let a = DockSnapshot::new(1, vec![icon(0.0, "Finder"), icon(50.0, "Mail")]);
        let b = DockSnapshot::new(7, vec![icon(50.0, "Mail"), icon(0.0, "Finder")]);
        assert!(a.same_layout(&b));
    }

    #[test]
    fn test_same_layout_detects_moved_icon() {
        let a = DockSnapshot::new(1, vec![icon(0.0, "Finder"), icon(50.0, "Mail")]);
        let b = DockSnapshot::new(2, vec![icon(0.0, "Finder"), icon(100.0, "Mail")]);
        assert!(!a.same_layout(&b));
    }

    #[test]
    fn test_same_layout_detects_length_change() {
        let a = DockSnapshot::new(1, vec![icon(0.0, "Finder")]);
        let b = DockSnapshot::new(2, vec![icon(0.0, "Finder"), icon(50.0, "Mail")]);
        assert!(!a.same_layout(&b));
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        let snapshot = DockSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.generation, 0);
    }
}
