//! The activation service: every piece of shared state, built once at startup.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::activation::{ActivationResolver, AliasTable, ProcessRegistry};
use crate::config::Click2HideConfig;
use crate::dock::{DockCache, IconLayoutProvider, Point, PresentationProbe, RefreshScheduler, RefreshTrigger};
use crate::interceptor::{ActionDispatcher, ClickDisposition, ClickInterceptor};

/// Platform collaborators the service is assembled from.
pub struct ServiceParts {
    pub provider: Arc<dyn IconLayoutProvider>,
    pub probe: Arc<dyn PresentationProbe>,
    pub registry: Arc<dyn ProcessRegistry>,
    pub dispatcher: Arc<dyn ActionDispatcher>,
}

/// Owns the feature flag, the Dock cache, the refresh scheduler and the click
/// interceptor.
#[derive(Debug)]
pub struct ActivationService {
    enabled: Arc<AtomicBool>,
    cache: Arc<DockCache>,
    scheduler: RefreshScheduler,
    interceptor: Arc<ClickInterceptor>,
    runtime: Handle,
}

impl ActivationService {
    /// Wires the service together. Nothing runs until [`start`](Self::start).
    #[must_use]
    pub fn new(config: &Click2HideConfig, runtime: Handle, enabled: bool, parts: ServiceParts) -> Self {
        let enabled = Arc::new(AtomicBool::new(enabled));
        let exclusive = Arc::new(AtomicBool::new(false));
        let cache = Arc::new(DockCache::new());

        let scheduler = RefreshScheduler::new(
            runtime.clone(),
            config.refresh_interval(),
            parts.provider,
            parts.probe,
            Arc::clone(&cache),
            Arc::clone(&exclusive),
        );

        let resolver = Arc::new(ActivationResolver::new(
            parts.registry,
            AliasTable::from_config(&config.aliases),
            &config.ignored_items,
        ));

        let interceptor = Arc::new(ClickInterceptor::new(
            Arc::clone(&enabled),
            exclusive,
            Arc::clone(&cache),
            resolver,
            parts.dispatcher,
        ));

        Self { enabled, cache, scheduler, interceptor, runtime }
    }

    /// Kicks off the eager first Dock refresh.
    pub fn start(&self) {
        tracing::info!(
            enabled = self.is_enabled(),
            debounce_ms = u64::try_from(self.scheduler.interval().as_millis()).unwrap_or(u64::MAX),
            "activation service starting"
        );
        self.scheduler.trigger(RefreshTrigger::Startup);
    }

    /// Keeps the enabled flag in sync with a preference subscription.
    pub fn follow_preferences(&self, mut changes: watch::Receiver<bool>) -> JoinHandle<()> {
        let enabled = Arc::clone(&self.enabled);
        self.runtime.spawn(async move {
            while changes.changed().await.is_ok() {
                let value = *changes.borrow_and_update();
                enabled.store(value, Ordering::Release);
                tracing::debug!(enabled = value, "feature flag updated");
            }
        })
    }

    /// Handles one left click; see [`ClickInterceptor::handle_click`].
    pub fn handle_click(&self, location: Point) -> ClickDisposition { self.interceptor.handle_click(location) }

    /// Returns the interceptor for installation into the event tap.
    #[must_use]
    pub fn interceptor(&self) -> Arc<ClickInterceptor> { Arc::clone(&self.interceptor) }

    /// Returns the refresh scheduler for wiring trigger sources.
    #[must_use]
    pub fn scheduler(&self) -> RefreshScheduler { self.scheduler.clone() }

    #[must_use]
    pub fn cache(&self) -> &DockCache { &self.cache }

    #[must_use]
    pub fn is_enabled(&self) -> bool { self.enabled.load(Ordering::Acquire) }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dock::{IconRecord, NeverExclusive, Rect};
    use crate::error::IntrospectionError;
    use crate::interceptor::InlineDispatcher;
    use crate::test_support::{Command, FakeRegistry, app};

    struct MailDock;

    impl IconLayoutProvider for MailDock {
        fn resolve(&self) -> Result<Vec<IconRecord>, IntrospectionError> {
            Ok(vec![IconRecord::new(Rect::new(0.0, 0.0, 50.0, 50.0), "Mail")])
        }
    }

    fn service(registry: Arc<FakeRegistry>, enabled: bool) -> ActivationService {
        ActivationService::new(
            &Click2HideConfig { refresh_debounce_ms: 50, ..Default::default() },
            Handle::current(),
            enabled,
            ServiceParts {
                provider: Arc::new(MailDock),
                probe: Arc::new(NeverExclusive),
                registry,
                dispatcher: Arc::new(InlineDispatcher),
            },
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_start_populates_cache() {
        let svc = service(FakeRegistry::with_apps(vec![]), true);
        assert!(svc.cache().get().is_empty());

        svc.start();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(svc.cache().get().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_click_before_first_refresh_passes_through() {
        let registry = FakeRegistry::with_apps(vec![app("Mail", true, false)]);
        let svc = service(registry.clone(), true);

        assert_eq!(svc.handle_click(Point::new(25.0, 25.0)), ClickDisposition::PassThrough);
        assert_eq!(registry.lookups(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_follow_preferences_updates_flag() {
        let registry = FakeRegistry::with_apps(vec![app("Mail", true, false)]);
        let svc = service(registry.clone(), true);
        svc.start();

        let (tx, rx) = watch::channel(true);
        let _task = svc.follow_preferences(rx);

        tx.send(false).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!svc.is_enabled());
        assert_eq!(svc.handle_click(Point::new(25.0, 25.0)), ClickDisposition::PassThrough);
        assert!(registry.commands().is_empty());

        tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(svc.handle_click(Point::new(25.0, 25.0)), ClickDisposition::Suppress);
        assert_eq!(registry.commands(), vec![Command::Hide("Mail".to_string())]);
    }
}
