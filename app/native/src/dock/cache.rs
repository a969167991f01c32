//! Latest published Dock snapshot, shared between the refresh worker and the
//! event tap thread.
//!
//! # Thread Safety
//!
//! The cache holds an `ArcSwap<DockSnapshot>`. Readers load the current
//! `Arc` without taking a lock and publishing is a single atomic pointer
//! store, so the event tap thread never waits on a writer and never observes
//! a partially written snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use super::snapshot::{DockSnapshot, IconRecord};

/// Single-writer, many-reader holder for the current [`DockSnapshot`].
#[derive(Debug, Default)]
pub struct DockCache {
    current: ArcSwap<DockSnapshot>,
    generation: AtomicU64,
}

impl DockCache {
    /// Creates a cache holding an empty snapshot.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the latest published snapshot.
    #[must_use]
    pub fn get(&self) -> Arc<DockSnapshot> { self.current.load_full() }

    /// Publishes a freshly resolved icon batch, replacing the previous one.
    ///
    /// Publication is last-writer-wins: a refresh that finishes later replaces
    /// whatever is current, even if it started earlier.
    ///
    /// Returns the generation assigned to the new snapshot.
    pub fn publish(&self, icons: Vec<IconRecord>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.current.store(Arc::new(DockSnapshot::new(generation, icons)));
        generation
    }

    /// Returns the generation of the latest published snapshot.
    #[must_use]
    pub fn generation(&self) -> u64 { self.current.load().generation }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::dock::geometry::Rect;

    fn icons(names: &[&str]) -> Vec<IconRecord> {
        names
            .iter()
            .zip(0u32..)
            .map(|(name, i)| IconRecord::new(Rect::new(f64::from(i) * 50.0, 0.0, 50.0, 50.0), *name))
            .collect()
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = DockCache::new();
        assert!(cache.get().is_empty());
        assert_eq!(cache.generation(), 0);
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let cache = DockCache::new();
        cache.publish(icons(&["Finder", "Mail"]));
        assert_eq!(cache.get().len(), 2);

        cache.publish(icons(&["Safari"]));
        let snapshot = cache.get();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.icons[0].identity, "Safari");
    }

    #[test]
    fn test_publish_increments_generation() {
        let cache = DockCache::new();
        assert_eq!(cache.publish(icons(&["Finder"])), 1);
        assert_eq!(cache.publish(icons(&["Finder"])), 2);
        assert_eq!(cache.generation(), 2);
    }

    #[test]
    fn test_reader_keeps_old_snapshot_alive() {
        let cache = DockCache::new();
        cache.publish(icons(&["Finder", "Mail"]));
        let held = cache.get();

        cache.publish(icons(&["Safari"]));

        assert_eq!(held.len(), 2);
        assert_eq!(cache.get().len(), 1);
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_snapshots() {
        let cache = Arc::new(DockCache::new());
        let writer_cache = Arc::clone(&cache);

        let writer = thread::spawn(move || {
            for round in 0..200 {
                let batch = if round % 2 == 0 {
                    icons(&["Finder", "Mail", "Safari"])
                } else {
                    icons(&["Notes", "Music", "Photos", "Maps"])
                };
                writer_cache.publish(batch);
            }
        });

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = cache.get();
                        assert!(matches!(snapshot.len(), 0 | 3 | 4));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(cache.generation(), 200);
    }
}
