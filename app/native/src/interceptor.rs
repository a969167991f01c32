//! Per-click decision logic for the global left-mouse-down hook.
//!
//! The handler runs on the event tap thread for every left click anywhere on
//! screen, so it only reads atomics and the cached Dock snapshot. Process
//! control is handed to an [`ActionDispatcher`] and never runs inline in the
//! daemon.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::activation::{Action, ActivationResolver};
use crate::dock::{DockCache, Point};

/// What the event tap should do with the physical click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    /// Deliver the click to the Dock unchanged.
    PassThrough,
    /// Drop the click; a hide or restore has been dispatched instead.
    Suppress,
}

/// Runs resolved actions somewhere other than the tap thread.
pub trait ActionDispatcher: Send + Sync {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send + 'static>);
}

/// Runs jobs immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDispatcher;

impl ActionDispatcher for InlineDispatcher {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send + 'static>) { job(); }
}

/// The global hook handler.
pub struct ClickInterceptor {
    enabled: Arc<AtomicBool>,
    exclusive: Arc<AtomicBool>,
    cache: Arc<DockCache>,
    resolver: Arc<ActivationResolver>,
    dispatcher: Arc<dyn ActionDispatcher>,
}

impl ClickInterceptor {
    #[must_use]
    pub fn new(
        enabled: Arc<AtomicBool>,
        exclusive: Arc<AtomicBool>,
        cache: Arc<DockCache>,
        resolver: Arc<ActivationResolver>,
        dispatcher: Arc<dyn ActionDispatcher>,
    ) -> Self {
        Self { enabled, exclusive, cache, resolver, dispatcher }
    }

    /// Handles one left-mouse-down at `location` (global screen coordinates).
    ///
    /// Never panics: a panic anywhere in the decision degrades to
    /// [`ClickDisposition::PassThrough`] so the user's click is never lost.
    pub fn handle_click(&self, location: Point) -> ClickDisposition {
        catch_unwind(AssertUnwindSafe(|| self.decide(location))).unwrap_or_else(|_| {
            tracing::error!(%location, "click handler panicked, passing click through");
            ClickDisposition::PassThrough
        })
    }

    fn decide(&self, location: Point) -> ClickDisposition {
        if !self.enabled.load(Ordering::Acquire) {
            return ClickDisposition::PassThrough;
        }

        if self.exclusive.load(Ordering::Acquire) {
            tracing::trace!(%location, "foreground app is fullscreen, passing click through");
            return ClickDisposition::PassThrough;
        }

        let snapshot = self.cache.get();
        let Some(icon) = snapshot.hit_test(location) else {
            return ClickDisposition::PassThrough;
        };

        tracing::debug!(%location, identity = %icon.identity, generation = snapshot.generation, "dock icon clicked");

        let resolution = self.resolver.resolve(&icon.identity);
        if resolution.action == Action::Ignore {
            return ClickDisposition::PassThrough;
        }

        let resolver = Arc::clone(&self.resolver);
        self.dispatcher.dispatch(Box::new(move || {
            if let Err(err) = resolver.execute(&resolution) {
                tracing::warn!(identity = %resolution.identity, error = %err, "dock action failed");
            }
        }));

        ClickDisposition::Suppress
    }
}

impl std::fmt::Debug for ClickInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickInterceptor")
            .field("enabled", &self.enabled.load(Ordering::Relaxed))
            .field("exclusive", &self.exclusive.load(Ordering::Relaxed))
            .field("generation", &self.cache.generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::activation::{AliasTable, ProcessRegistry, RunningApp};
    use crate::dock::{IconRecord, Rect};
    use crate::error::ActivationError;
    use crate::test_support::{Command, FakeRegistry, app};

    /// Dispatcher that queues jobs so tests can check the click returns first.
    #[derive(Default)]
    struct QueueDispatcher {
        jobs: Mutex<Vec<Box<dyn FnOnce() + Send + 'static>>>,
    }

    impl QueueDispatcher {
        fn run_all(&self) {
            let jobs: Vec<_> = self.jobs.lock().drain(..).collect();
            for job in jobs {
                job();
            }
        }

        fn pending(&self) -> usize { self.jobs.lock().len() }
    }

    impl ActionDispatcher for QueueDispatcher {
        fn dispatch(&self, job: Box<dyn FnOnce() + Send + 'static>) { self.jobs.lock().push(job); }
    }

    struct PanickingRegistry;

    impl ProcessRegistry for PanickingRegistry {
        fn find_by_names(&self, _names: &[&str]) -> Option<RunningApp> { panic!("lookup exploded") }

        fn running_names(&self) -> Vec<String> { Vec::new() }

        fn launch_or_activate(&self, _name: &str) -> Result<(), ActivationError> { Ok(()) }

        fn unhide(&self, _app: &RunningApp) -> Result<(), ActivationError> { Ok(()) }

        fn activate(&self, _app: &RunningApp) -> Result<(), ActivationError> { Ok(()) }

        fn hide(&self, _app: &RunningApp) -> Result<(), ActivationError> { Ok(()) }
    }

    struct Harness {
        interceptor: ClickInterceptor,
        enabled: Arc<AtomicBool>,
        exclusive: Arc<AtomicBool>,
    }

    fn harness(registry: Arc<dyn ProcessRegistry>, dispatcher: Arc<dyn ActionDispatcher>) -> Harness {
        let cache = Arc::new(DockCache::new());
        cache.publish(vec![
            IconRecord::new(Rect::new(0.0, 0.0, 50.0, 50.0), "Mail"),
            IconRecord::new(Rect::new(50.0, 0.0, 50.0, 50.0), "Trash"),
        ]);

        let enabled = Arc::new(AtomicBool::new(true));
        let exclusive = Arc::new(AtomicBool::new(false));
        let resolver = Arc::new(ActivationResolver::new(registry, AliasTable::with_defaults(), &[]));

        Harness {
            interceptor: ClickInterceptor::new(
                Arc::clone(&enabled),
                Arc::clone(&exclusive),
                cache,
                resolver,
                dispatcher,
            ),
            enabled,
            exclusive,
        }
    }

    #[test]
    fn test_hidden_background_app_is_restored() {
        let registry = FakeRegistry::with_apps(vec![app("Mail", false, true)]);
        let h = harness(registry.clone(), Arc::new(InlineDispatcher));

        assert_eq!(h.interceptor.handle_click(Point::new(25.0, 25.0)), ClickDisposition::Suppress);
        assert_eq!(
            registry.commands(),
            vec![
                Command::LaunchOrActivate("Mail".to_string()),
                Command::Unhide("Mail".to_string()),
                Command::Activate("Mail".to_string()),
            ]
        );
    }

    #[test]
    fn test_foreground_visible_app_is_hidden() {
        let registry = FakeRegistry::with_apps(vec![app("Mail", true, false)]);
        let h = harness(registry.clone(), Arc::new(InlineDispatcher));

        assert_eq!(h.interceptor.handle_click(Point::new(25.0, 25.0)), ClickDisposition::Suppress);
        assert_eq!(registry.commands(), vec![Command::Hide("Mail".to_string())]);
    }

    #[test]
    fn test_click_outside_passes_through_without_lookup() {
        let registry = FakeRegistry::with_apps(vec![app("Mail", true, false)]);
        let h = harness(registry.clone(), Arc::new(InlineDispatcher));

        assert_eq!(h.interceptor.handle_click(Point::new(100.0, 100.0)), ClickDisposition::PassThrough);
        assert_eq!(registry.lookups(), 0);
        assert!(registry.commands().is_empty());
    }

    #[test]
    fn test_disabled_never_resolves() {
        let registry = FakeRegistry::with_apps(vec![app("Mail", true, false)]);
        let h = harness(registry.clone(), Arc::new(InlineDispatcher));
        h.enabled.store(false, Ordering::SeqCst);

        for x in [10.0, 25.0, 49.0, 75.0, 200.0] {
            assert_eq!(h.interceptor.handle_click(Point::new(x, 25.0)), ClickDisposition::PassThrough);
        }
        assert_eq!(registry.lookups(), 0);
        assert!(registry.commands().is_empty());
    }

    #[test]
    fn test_exclusive_presentation_passes_through() {
        let registry = FakeRegistry::with_apps(vec![app("Mail", true, false)]);
        let h = harness(registry.clone(), Arc::new(InlineDispatcher));
        h.exclusive.store(true, Ordering::SeqCst);

        assert_eq!(h.interceptor.handle_click(Point::new(25.0, 25.0)), ClickDisposition::PassThrough);
        assert_eq!(registry.lookups(), 0);
    }

    #[test]
    fn test_denylisted_icon_passes_through() {
        let registry = FakeRegistry::with_apps(vec![app("Trash", true, false)]);
        let h = harness(registry.clone(), Arc::new(InlineDispatcher));

        assert_eq!(h.interceptor.handle_click(Point::new(75.0, 25.0)), ClickDisposition::PassThrough);
        assert!(registry.commands().is_empty());
    }

    #[test]
    fn test_not_running_app_passes_through() {
        let registry = FakeRegistry::with_apps(vec![app("Safari", true, false)]);
        let h = harness(registry.clone(), Arc::new(InlineDispatcher));

        assert_eq!(h.interceptor.handle_click(Point::new(25.0, 25.0)), ClickDisposition::PassThrough);
        assert!(registry.commands().is_empty());
    }

    #[test]
    fn test_suppresses_even_when_action_fails() {
        let registry = FakeRegistry::refusing_hide(vec![app("Mail", true, false)]);
        let h = harness(registry.clone(), Arc::new(InlineDispatcher));

        assert_eq!(h.interceptor.handle_click(Point::new(25.0, 25.0)), ClickDisposition::Suppress);
        assert_eq!(registry.commands(), vec![Command::Hide("Mail".to_string())]);
    }

    #[test]
    fn test_action_is_dispatched_not_run_inline() {
        let registry = FakeRegistry::with_apps(vec![app("Mail", true, false)]);
        let dispatcher = Arc::new(QueueDispatcher::default());
        let h = harness(registry.clone(), dispatcher.clone());

        assert_eq!(h.interceptor.handle_click(Point::new(25.0, 25.0)), ClickDisposition::Suppress);
        assert!(registry.commands().is_empty());
        assert_eq!(dispatcher.pending(), 1);

        dispatcher.run_all();
        assert_eq!(registry.commands(), vec![Command::Hide("Mail".to_string())]);
    }

    #[test]
    fn test_panic_degrades_to_pass_through() {
        let h = harness(Arc::new(PanickingRegistry), Arc::new(InlineDispatcher));
        assert_eq!(h.interceptor.handle_click(Point::new(25.0, 25.0)), ClickDisposition::PassThrough);
    }
}
