//! # Layout Flows
//!
//! Grid placement feeding the persistence boundary.
//!
//! ## Flows tested
//!
//! 1. **Cascading placement**: repeated inserts never overlap at any
//!    breakpoint.
//! 2. **Round trip**: a saved layout hydrates identically from the local
//!    tier.
//! 3. **Boundary validation**: malformed payloads touch no tier; legacy
//!    snake_case payloads still hydrate.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pb_02_grid_engine::{count_items, empty_layout, insert, GridConfig};
    use pb_03_session_sync::{InMemoryCache, SessionSyncService, SnapshotCache};
    use serde_json::json;
    use shared_types::{Breakpoint, LayoutItem, SessionSnapshot};

    fn overlaps(a: &LayoutItem, b: &LayoutItem) -> bool {
        a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
    }

    // =============================================================================
    // CASCADING PLACEMENT
    // =============================================================================

    #[test]
    fn cascading_inserts_never_overlap_at_any_breakpoint() {
        let config = GridConfig::default();
        let mut layout = empty_layout();
        for n in 0..6 {
            layout = insert(&config, &layout, &format!("SERVICE-Nvidia-p{n}"), None);
        }
        assert_eq!(count_items(&layout), 6 * Breakpoint::ALL.len());

        for bp in Breakpoint::ALL {
            let items = layout.items(bp);
            for (index, a) in items.iter().enumerate() {
                for b in &items[index + 1..] {
                    assert!(
                        !overlaps(a, b),
                        "{} overlaps {} at {}",
                        a.i,
                        b.i,
                        bp.as_str()
                    );
                }
                // Oversized items clamp to column 0; everything else stays
                // inside the row.
                assert!(a.x + a.w <= config.columns(bp).max(a.w));
            }
        }
    }

    // =============================================================================
    // ROUND TRIP THROUGH THE LOCAL TIER
    // =============================================================================

    #[tokio::test]
    async fn saved_layout_hydrates_identically() {
        let local: Arc<InMemoryCache> = Arc::new(InMemoryCache::new());
        let config = GridConfig::default();
        let mut layout = empty_layout();
        for n in 0..3 {
            layout = insert(&config, &layout, &format!("SYSTEM-Super-p{n}"), None);
        }
        let snapshot = SessionSnapshot {
            grid_layout: layout,
            active_modules: (0..3).map(|n| format!("SYSTEM-Super-p{n}")).collect(),
        };

        let writer = SessionSyncService::new(local.clone(), Arc::new(InMemoryCache::new()));
        assert!(writer.save_snapshot(&snapshot));

        let reader = SessionSyncService::new(local, Arc::new(InMemoryCache::new()));
        let hydrated = reader.load_snapshot().await;
        assert_eq!(hydrated.active_modules, snapshot.active_modules);
        for bp in Breakpoint::ALL {
            assert_eq!(hydrated.grid_layout.items(bp), snapshot.grid_layout.items(bp));
        }
    }

    // =============================================================================
    // BOUNDARY VALIDATION
    // =============================================================================

    #[tokio::test]
    async fn malformed_payloads_touch_no_tier() {
        let local = Arc::new(InMemoryCache::new());
        let session = Arc::new(InMemoryCache::new());
        let service = SessionSyncService::new(local.clone(), session.clone());

        // Breakpoint missing entirely.
        assert!(!service.save_raw(&json!({"lg": [], "md": [], "sm": [], "xs": []}), &[]));
        // Breakpoint present but not a sequence.
        assert!(!service.save_raw(
            &json!({"lg": [], "md": [], "sm": [], "xs": [], "xxs": 7}),
            &[]
        ));
        // Item with a fractional coordinate.
        assert!(!service.save_raw(
            &json!({
                "lg": [{"i": "SYSTEM-Super-a", "x": 0.5, "y": 0, "w": 12, "h": 8}],
                "md": [], "sm": [], "xs": [], "xxs": []
            }),
            &[]
        ));
        assert!(local.is_empty());
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn legacy_snake_case_cache_payloads_hydrate() {
        let local = Arc::new(InMemoryCache::new());
        let stored = json!({
            "lg": [{"i": "SYSTEM-Super-a", "x": 0, "y": 0, "w": 12, "h": 8}]
        });
        local.set("paneboard.layouts", &stored.to_string());
        local.set("paneboard.active_modules", r#"["SYSTEM-Super-a"]"#);

        let service = SessionSyncService::new(local, Arc::new(InMemoryCache::new()));
        let snapshot = service.load_snapshot().await;
        assert_eq!(snapshot.grid_layout.items(Breakpoint::Lg).len(), 1);
        // Breakpoints absent from the stored payload come back empty, not
        // missing.
        assert!(snapshot.grid_layout.items(Breakpoint::Xxs).is_empty());
        assert_eq!(snapshot.active_modules, vec!["SYSTEM-Super-a"]);
    }
}
