//! Debounced Dock refresh scheduling.
//!
//! Desktop lifecycle notifications arrive in bursts (launching one app fires
//! launch, activate and deactivate within a few milliseconds). The scheduler
//! turns each burst into a single Dock query:
//!
//! ```text
//!            trigger / dispatch refresh
//!   Idle ────────────────────────────────▶ CoolingDown
//!    ▲                                         │
//!    └──────────── interval elapsed ───────────┘
//!     (triggers while cooling down skip the Dock query
//!      but still re-sample the fullscreen state)
//! ```
//!
//! The refresh itself runs on a tokio blocking worker and the cooldown is a
//! tokio sleep, so neither ever touches the event tap thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;

use super::cache::DockCache;
use super::layout::{IconLayoutProvider, PresentationProbe};
use crate::error::IntrospectionError;

const IDLE: u8 = 0;
const COOLING_DOWN: u8 = 1;

/// Why a refresh was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Eager refresh when the service starts.
    Startup,
    AppLaunched,
    AppActivated,
    AppDeactivated,
    AppTerminated,
    /// The user switched Spaces.
    SpaceChanged,
}

impl RefreshTrigger {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::AppLaunched => "app-launched",
            Self::AppActivated => "app-activated",
            Self::AppDeactivated => "app-deactivated",
            Self::AppTerminated => "app-terminated",
            Self::SpaceChanged => "space-changed",
        }
    }
}

/// Coalesces refresh triggers and keeps the [`DockCache`] current.
#[derive(Clone)]
pub struct RefreshScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    state: AtomicU8,
    interval: Duration,
    provider: Arc<dyn IconLayoutProvider>,
    probe: Arc<dyn PresentationProbe>,
    cache: Arc<DockCache>,
    exclusive: Arc<AtomicBool>,
    runtime: Handle,
}

impl RefreshScheduler {
    /// Creates a scheduler in the `Idle` state.
    ///
    /// `exclusive` is the flag the click path reads to skip fullscreen apps;
    /// every refresh samples `probe` and stores the result there.
    #[must_use]
    pub fn new(
        runtime: Handle,
        interval: Duration,
        provider: Arc<dyn IconLayoutProvider>,
        probe: Arc<dyn PresentationProbe>,
        cache: Arc<DockCache>,
        exclusive: Arc<AtomicBool>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                state: AtomicU8::new(IDLE),
                interval,
                provider,
                probe,
                cache,
                exclusive,
                runtime,
            }),
        }
    }

    /// Requests a refresh.
    ///
    /// In `Idle` this opens a cooldown window and dispatches exactly one
    /// refresh. While a window is open the layout query is dropped, but the
    /// foreground presentation is still re-sampled so the click path never
    /// acts on a fullscreen state that predates the latest app switch.
    ///
    /// # Returns
    ///
    /// `true` if a refresh was dispatched, `false` if the trigger was coalesced.
    pub fn trigger(&self, reason: RefreshTrigger) -> bool {
        if self
            .inner
            .state
            .compare_exchange(IDLE, COOLING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::trace!(trigger = reason.as_str(), "refresh coalesced, sampling presentation only");
            let worker = Arc::clone(&self.inner);
            self.inner.runtime.spawn_blocking(move || worker.sample_presentation());
            return false;
        }

        tracing::debug!(trigger = reason.as_str(), "dispatching dock refresh");

        let worker = Arc::clone(&self.inner);
        self.inner.runtime.spawn_blocking(move || {
            // Errors are logged inside; the previous snapshot stays in place.
            let _ = worker.refresh();
        });

        let timer = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            tokio::time::sleep(timer.interval).await;
            timer.state.store(IDLE, Ordering::Release);
        });

        true
    }

    /// Runs one refresh synchronously on the calling thread, bypassing the
    /// debounce window.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the cache is left untouched in that case.
    pub fn refresh_blocking(&self) -> Result<u64, IntrospectionError> { self.inner.refresh() }

    /// Returns whether a debounce window is currently open.
    #[must_use]
    pub fn is_cooling_down(&self) -> bool { self.inner.state.load(Ordering::Acquire) == COOLING_DOWN }

    /// Returns the configured debounce interval.
    #[must_use]
    pub fn interval(&self) -> Duration { self.inner.interval }
}

impl SchedulerInner {
    fn sample_presentation(&self) -> bool {
        let exclusive = self.probe.foreground_is_exclusive();
        if self.exclusive.swap(exclusive, Ordering::AcqRel) != exclusive {
            tracing::debug!(exclusive, "foreground presentation changed");
        }
        exclusive
    }

    fn refresh(&self) -> Result<u64, IntrospectionError> {
        let exclusive = self.sample_presentation();

        match self.provider.resolve() {
            Ok(icons) => {
                let unchanged = self.cache.get().has_icons(&icons);
                let count = icons.len();
                let generation = self.cache.publish(icons);
                tracing::debug!(generation, icons = count, unchanged, exclusive, "dock snapshot published");
                Ok(generation)
            }
            Err(err) => {
                if matches!(err, IntrospectionError::Empty) {
                    tracing::debug!(error = %err, "dock layout temporarily unknown, keeping previous snapshot");
                } else {
                    tracing::warn!(error = %err, "dock refresh failed, keeping previous snapshot");
                }
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("interval", &self.inner.interval)
            .field("cooling_down", &self.is_cooling_down())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    use parking_lot::Mutex;

    use super::*;
    use crate::dock::geometry::Rect;
    use crate::dock::layout::NeverExclusive;
    use crate::dock::snapshot::IconRecord;

    /// Provider that counts calls and always returns the same layout.
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Arc<Self> { Arc::new(Self { calls: AtomicUsize::new(0) }) }

        fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
    }

    impl IconLayoutProvider for CountingProvider {
        fn resolve(&self) -> Result<Vec<IconRecord>, IntrospectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                IconRecord::new(Rect::new(0.0, 0.0, 50.0, 50.0), "Finder"),
                IconRecord::new(Rect::new(50.0, 0.0, 50.0, 50.0), "Mail"),
            ])
        }
    }

    /// Provider that replays a scripted sequence of results.
    struct ScriptedProvider {
        results: Mutex<VecDeque<Result<Vec<IconRecord>, IntrospectionError>>>,
    }

    impl IconLayoutProvider for ScriptedProvider {
        fn resolve(&self) -> Result<Vec<IconRecord>, IntrospectionError> {
            self.results.lock().pop_front().unwrap_or(Err(IntrospectionError::Empty))
        }
    }

    struct FixedProbe(bool);

    impl PresentationProbe for FixedProbe {
        fn foreground_is_exclusive(&self) -> bool { self.0 }
    }

    #[derive(Default)]
    struct SwitchableProbe(AtomicBool);

    impl PresentationProbe for SwitchableProbe {
        fn foreground_is_exclusive(&self) -> bool { self.0.load(Ordering::SeqCst) }
    }

    fn scheduler_with(
        provider: Arc<dyn IconLayoutProvider>,
        probe: Arc<dyn PresentationProbe>,
        interval: Duration,
    ) -> (RefreshScheduler, Arc<DockCache>, Arc<AtomicBool>) {
        let cache = Arc::new(DockCache::new());
        let exclusive = Arc::new(AtomicBool::new(false));
        let scheduler = RefreshScheduler::new(
            Handle::current(),
            interval,
            provider,
            probe,
            Arc::clone(&cache),
            Arc::clone(&exclusive),
        );
        (scheduler, cache, exclusive)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_burst_of_triggers_resolves_once() {
        let provider = CountingProvider::new();
        let (scheduler, cache, _) =
            scheduler_with(provider.clone(), Arc::new(NeverExclusive), Duration::from_millis(400));

        let dispatched = (0..10).filter(|_| scheduler.trigger(RefreshTrigger::AppActivated)).count();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(dispatched, 1);
        assert_eq!(provider.calls(), 1);
        assert_eq!(cache.get().len(), 2);
        assert!(scheduler.is_cooling_down());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_trigger_after_window_resolves_again() {
        let provider = CountingProvider::new();
        let (scheduler, cache, _) =
            scheduler_with(provider.clone(), Arc::new(NeverExclusive), Duration::from_millis(100));

        assert!(scheduler.trigger(RefreshTrigger::Startup));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!scheduler.is_cooling_down());

        assert!(scheduler.trigger(RefreshTrigger::AppLaunched));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(provider.calls(), 2);
        assert_eq!(cache.generation(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unchanged_desktop_gives_identical_layout() {
        let provider = CountingProvider::new();
        let (scheduler, cache, _) =
            scheduler_with(provider.clone(), Arc::new(NeverExclusive), Duration::from_millis(50));

        scheduler.refresh_blocking().unwrap();
        let first = cache.get();
        scheduler.refresh_blocking().unwrap();
        let second = cache.get();

        assert!(first.same_layout(&second));
        assert!(second.generation > first.generation);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let provider = Arc::new(ScriptedProvider {
            results: Mutex::new(VecDeque::from([
                Ok(vec![IconRecord::new(Rect::new(0.0, 0.0, 50.0, 50.0), "Mail")]),
                Err(IntrospectionError::DockNotRunning),
                Err(IntrospectionError::Empty),
            ])),
        });
        let (scheduler, cache, _) =
            scheduler_with(provider, Arc::new(NeverExclusive), Duration::from_millis(50));

        assert_eq!(scheduler.refresh_blocking().ok(), Some(1));
        assert!(scheduler.refresh_blocking().is_err());
        assert!(scheduler.refresh_blocking().is_err());

        let snapshot = cache.get();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.icons[0].identity, "Mail");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_refresh_publishes_exclusive_flag() {
        let provider = CountingProvider::new();
        let (scheduler, _, exclusive) =
            scheduler_with(provider, Arc::new(FixedProbe(true)), Duration::from_millis(50));

        assert!(scheduler.trigger(RefreshTrigger::SpaceChanged));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(exclusive.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_coalesced_trigger_still_tracks_fullscreen() {
        let provider = CountingProvider::new();
        let probe = Arc::new(SwitchableProbe::default());
        let (scheduler, _, exclusive) =
            scheduler_with(provider.clone(), probe.clone(), Duration::from_millis(500));

        assert!(scheduler.trigger(RefreshTrigger::AppDeactivated));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!exclusive.load(Ordering::SeqCst));

        // A fullscreen app comes forward inside the same window
        probe.0.store(true, Ordering::SeqCst);
        assert!(!scheduler.trigger(RefreshTrigger::AppActivated));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(exclusive.load(Ordering::SeqCst));
        assert_eq!(provider.calls(), 1);

        probe.0.store(false, Ordering::SeqCst);
        assert!(!scheduler.trigger(RefreshTrigger::AppActivated));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!exclusive.load(Ordering::SeqCst));
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_trigger_names() {
        assert_eq!(RefreshTrigger::Startup.as_str(), "startup");
        assert_eq!(RefreshTrigger::SpaceChanged.as_str(), "space-changed");
    }
}
