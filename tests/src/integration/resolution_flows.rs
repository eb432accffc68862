//! # Resolution Flows
//!
//! Registry and resolver working together across real thread boundaries.
//!
//! ## Flows tested
//!
//! 1. **Single-flight under contention**: many tasks on a multi-thread
//!    runtime requesting one pane drive exactly one load.
//! 2. **Change events**: a UI-side subscriber observes the instance
//!    lifecycle without polling.
//! 3. **Diagnostics**: failed loads leave durable error records and stay
//!    retryable.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use pb_01_component_registry::{
        CountingLoader, PaneRegistry, RegistryEvent, ResolveError, ResolverService, StaticUnit,
    };
    use shared_types::{LoadError, ModuleDescriptor, ModuleType, Renderable, UnitLoader};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Loader slow enough that every contender piles onto the in-flight
    /// entry before the first resolution settles.
    struct SlowLoader {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl UnitLoader for SlowLoader {
        async fn load(&self) -> Result<Arc<dyn Renderable>, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(StaticUnit::shared("slow-unit"))
        }
    }

    fn resolver_over(loader: Arc<dyn UnitLoader>) -> Arc<ResolverService> {
        let registry = Arc::new(PaneRegistry::new());
        let mut catalog = BTreeMap::new();
        catalog.insert(
            "Nvidia".to_string(),
            ModuleDescriptor::new(ModuleType::Service, "Nvidia").with_loader(loader),
        );
        registry.set_module_data(&catalog);
        Arc::new(ResolverService::new(registry))
    }

    // =============================================================================
    // SINGLE-FLIGHT UNDER CONTENTION
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn contended_resolution_loads_once() {
        let loader = Arc::new(SlowLoader {
            calls: AtomicUsize::new(0),
        });
        let resolver = resolver_over(loader.clone());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let resolver = Arc::clone(&resolver);
            handles.push(tokio::spawn(async move {
                resolver.resolve_pane("SERVICE-Nvidia-z9").await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().unit_name(), "slow-unit");
        }
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.in_flight_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn distinct_panes_load_independently() {
        let loader = Arc::new(SlowLoader {
            calls: AtomicUsize::new(0),
        });
        let resolver = resolver_over(loader.clone());

        let a = tokio::spawn({
            let resolver = Arc::clone(&resolver);
            async move { resolver.resolve_pane("SERVICE-Nvidia-a1").await }
        });
        let b = tokio::spawn({
            let resolver = Arc::clone(&resolver);
            async move { resolver.resolve_pane("SERVICE-Nvidia-b2").await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            resolver.registry().list_instance_keys(),
            vec!["SERVICE-Nvidia-a1", "SERVICE-Nvidia-b2"]
        );
    }

    // =============================================================================
    // CHANGE EVENTS
    // =============================================================================

    #[tokio::test]
    async fn subscriber_observes_the_instance_lifecycle() {
        let loader = Arc::new(CountingLoader::new("nvidia"));
        let resolver = resolver_over(loader);
        let mut rx = resolver.registry().subscribe();

        resolver.resolve_pane("SERVICE-Nvidia-z9").await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            RegistryEvent::InstanceRegistered {
                key: "SERVICE-Nvidia-z9".to_string()
            }
        );

        resolver
            .registry()
            .register("SERVICE-Nvidia-z9", StaticUnit::shared("hot-swap"));
        assert_eq!(
            rx.recv().await.unwrap(),
            RegistryEvent::InstanceReplaced {
                key: "SERVICE-Nvidia-z9".to_string()
            }
        );
    }

    // =============================================================================
    // DIAGNOSTICS
    // =============================================================================

    #[tokio::test]
    async fn failed_loads_leave_records_and_stay_retryable() {
        let loader = Arc::new(CountingLoader::failing("nvidia"));
        let resolver = resolver_over(loader.clone());

        for _ in 0..2 {
            let outcome = resolver.resolve_pane("SERVICE-Nvidia-z9").await;
            assert!(matches!(outcome, Err(ResolveError::LoadFailed { .. })));
        }
        assert_eq!(loader.calls(), 2);

        let record = resolver
            .registry()
            .last_error("SERVICE-Nvidia-z9")
            .expect("failure should be recorded");
        assert!(record.message.contains("Nvidia"));
        assert!(!resolver.registry().contains("SERVICE-Nvidia-z9"));
    }
}
