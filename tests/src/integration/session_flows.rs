//! # Session Flows
//!
//! Full lifecycle choreography across all four subsystem crates: catalog
//! discovery, resolution, placement and persistence.
//!
//! ## Flows tested
//!
//! 1. **Restart continuity**: panes added in one session come back
//!    resolved and placed after a fresh boot over the same local tier.
//! 2. **Remote precedence**: a reachable remote beats the local tier.
//! 3. **UI notification**: orchestrator mutations surface as registry
//!    events.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use board_runtime::{SessionOrchestrator, StaticCatalog};
    use pb_01_component_registry::{
        CountingLoader, PaneRegistry, RegistryEvent, ResolverService,
    };
    use pb_03_session_sync::{
        InMemoryCache, RemoteSession, SessionSyncService, SnapshotCache, TransportError,
    };
    use serde_json::json;
    use shared_types::{Breakpoint, LayoutSet, ModuleDescriptor, ModuleType};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct FixedRemote {
        payload: serde_json::Value,
        layout_pushes: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RemoteSession for FixedRemote {
        async fn fetch_snapshot(&self) -> Result<serde_json::Value, TransportError> {
            Ok(self.payload.clone())
        }

        async fn put_layout(&self, _layout: &LayoutSet) -> Result<(), TransportError> {
            self.layout_pushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn put_active_modules(&self, _active: &[String]) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn build_orchestrator(
        local: Arc<dyn SnapshotCache>,
        remote: Option<Arc<FixedRemote>>,
    ) -> SessionOrchestrator {
        let registry = Arc::new(PaneRegistry::new());
        let resolver = Arc::new(ResolverService::new(registry));
        let mut sync =
            SessionSyncService::new(local, Arc::new(InMemoryCache::new()));
        if let Some(remote) = remote {
            sync = sync.with_remote(remote);
        }
        let catalog = Arc::new(StaticCatalog::new(vec![
            ModuleDescriptor::new(ModuleType::System, "Super")
                .with_loader(Arc::new(CountingLoader::new("super"))),
            ModuleDescriptor::new(ModuleType::Service, "Nvidia")
                .with_name("GPU Monitor")
                .with_loader(Arc::new(CountingLoader::new("nvidia"))),
        ]));
        SessionOrchestrator::new(resolver, Arc::new(sync), catalog)
    }

    // =============================================================================
    // RESTART CONTINUITY
    // =============================================================================

    #[tokio::test]
    async fn session_survives_a_restart_via_the_local_tier() {
        let local: Arc<InMemoryCache> = Arc::new(InMemoryCache::new());

        // First session: boot empty, add two panes, persist.
        let first = build_orchestrator(local.clone(), None);
        let report = first.boot().await;
        assert_eq!(report.resolved + report.failed, 0);
        let super_pane = first.add_pane(ModuleType::System, "Super").await.unwrap();
        let gpu_pane = first.add_pane(ModuleType::Service, "Nvidia").await.unwrap();
        assert!(first.flush());

        // Second session over the same local tier.
        let second = build_orchestrator(local, None);
        let report = second.boot().await;
        assert_eq!(report.resolved, 2);
        assert_eq!(report.failed, 0);
        assert!(second.registry().contains(&super_pane));
        assert!(second.registry().contains(&gpu_pane));
        let snapshot = second.snapshot();
        for bp in Breakpoint::ALL {
            assert_eq!(snapshot.grid_layout.items(bp).len(), 2);
        }

        // Remove one pane and restart again.
        assert!(second.remove_pane(&super_pane));
        assert!(second.flush());
        let third = build_orchestrator(
            Arc::new(InMemoryCache::new()),
            None,
        );
        // Fresh tier, nothing stored: boots empty.
        let report = third.boot().await;
        assert_eq!(report.resolved, 0);
    }

    // =============================================================================
    // REMOTE PRECEDENCE
    // =============================================================================

    #[tokio::test]
    async fn reachable_remote_beats_the_local_tier() {
        let local: Arc<InMemoryCache> = Arc::new(InMemoryCache::new());
        let stale = json!({
            "lg": [{"i": "SYSTEM-Super-old1", "x": 0, "y": 0, "w": 12, "h": 8}]
        });
        local.set("paneboard.layouts", &stale.to_string());
        local.set("paneboard.active_modules", r#"["SYSTEM-Super-old1"]"#);

        let remote = Arc::new(FixedRemote {
            payload: json!({
                "gridLayout": {
                    "lg": [{"i": "SERVICE-Nvidia-new1", "x": 0, "y": 0, "w": 12, "h": 8}]
                },
                "activeModules": ["SERVICE-Nvidia-new1"]
            }),
            layout_pushes: AtomicUsize::new(0),
        });
        let orchestrator = build_orchestrator(local.clone(), Some(remote.clone()));

        let report = orchestrator.boot().await;
        assert_eq!(report.resolved, 1);
        assert!(orchestrator.registry().contains("SERVICE-Nvidia-new1"));
        assert!(!orchestrator.registry().contains("SYSTEM-Super-old1"));
        // The local tier now mirrors the remote state.
        assert!(local
            .get("paneboard.layouts")
            .unwrap()
            .contains("SERVICE-Nvidia-new1"));
        assert_eq!(remote.layout_pushes.load(Ordering::SeqCst), 0);
    }

    // =============================================================================
    // UI NOTIFICATION
    // =============================================================================

    #[tokio::test]
    async fn orchestrator_mutations_surface_as_events() {
        let orchestrator = build_orchestrator(Arc::new(InMemoryCache::new()), None);
        orchestrator.boot().await;
        let mut rx = orchestrator.subscribe();

        let pane_id = orchestrator
            .add_pane(ModuleType::Service, "Nvidia")
            .await
            .unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            RegistryEvent::InstanceRegistered {
                key: pane_id.clone()
            }
        );
        assert_eq!(orchestrator.registry().instance_count(), 1);
    }
}
