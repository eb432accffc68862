//! # Session Orchestrator
//!
//! Drives one board session end to end: boots the catalog and snapshot,
//! resolves panes, and persists layout mutations through the synchronizer
//! with a trailing debounce so bursts of mutations coalesce into one save.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::join_all;
use pb_01_component_registry::{PaneRegistry, RegistryEvent, ResolveError, ResolverService};
use pb_02_grid_engine::GridConfig;
use pb_03_session_sync::SessionSyncService;
use shared_types::{compose_key, ModuleType, SessionSnapshot, Size};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ports::ModuleCatalog;

/// Outcome of a session boot.
#[derive(Debug, Clone)]
pub struct BootReport {
    /// Active panes successfully resolved.
    pub resolved: usize,
    /// Active panes whose resolution failed.
    pub failed: usize,
    /// The hydrated snapshot the session starts from.
    pub snapshot: SessionSnapshot,
}

/// The session driver.
pub struct SessionOrchestrator {
    registry: Arc<PaneRegistry>,
    resolver: Arc<ResolverService>,
    sync: Arc<SessionSyncService>,
    catalog: Arc<dyn ModuleCatalog>,
    grid: GridConfig,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    save_scheduled: Arc<AtomicBool>,
}

impl SessionOrchestrator {
    /// Orchestrator over the given collaborators, with default grid
    /// dimensions.
    pub fn new(
        resolver: Arc<ResolverService>,
        sync: Arc<SessionSyncService>,
        catalog: Arc<dyn ModuleCatalog>,
    ) -> Self {
        Self {
            registry: Arc::clone(resolver.registry()),
            resolver,
            sync,
            catalog,
            grid: GridConfig::default(),
            snapshot: Arc::new(RwLock::new(SessionSnapshot::empty())),
            save_scheduled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the grid dimension table.
    #[must_use]
    pub fn with_grid_config(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Boot the session.
    ///
    /// Catalog fetches and pane resolutions fail individually, never
    /// collectively: a partial outage shows up as counts in the report
    /// while everything else proceeds.
    pub async fn boot(&self) -> BootReport {
        let mut descriptors = BTreeMap::new();
        for module_type in ModuleType::ALL {
            match self.catalog.fetch_descriptors(module_type).await {
                Ok(batch) => {
                    for descriptor in batch {
                        descriptors.insert(descriptor.static_identifier.clone(), descriptor);
                    }
                }
                Err(error) => {
                    warn!(%error, %module_type, "Catalog fetch failed; continuing without this type");
                }
            }
        }
        self.registry.set_module_data(&descriptors);

        let snapshot = self.sync.load_snapshot().await;
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot.clone();

        let resolutions = join_all(
            snapshot
                .active_modules
                .iter()
                .map(|pane_id| self.resolver.resolve_pane(pane_id)),
        )
        .await;
        let mut resolved = 0;
        let mut failed = 0;
        for (pane_id, outcome) in snapshot.active_modules.iter().zip(resolutions) {
            match outcome {
                Ok(_) => resolved += 1,
                Err(error) => {
                    warn!(%error, pane_id = %pane_id, "Pane resolution failed at boot");
                    failed += 1;
                }
            }
        }
        info!(
            catalog_entries = descriptors.len(),
            resolved, failed, "Session booted"
        );
        BootReport {
            resolved,
            failed,
            snapshot,
        }
    }

    /// Add a fresh pane of the given type and implementation.
    ///
    /// Composes a new 3-part pane id, resolves its unit, places it across
    /// every breakpoint and schedules persistence. Returns the pane id.
    pub async fn add_pane(
        &self,
        module_type: ModuleType,
        static_identifier: &str,
    ) -> Result<String, ResolveError> {
        let suffix = Uuid::new_v4().simple().to_string();
        let pane_id = compose_key(
            module_type.as_str(),
            static_identifier,
            Some(&suffix[..8]),
        );
        if pane_id.is_empty() {
            return Err(ResolveError::EmptyKey);
        }
        self.resolver
            .resolve(module_type.as_str(), static_identifier, Some(&pane_id))
            .await?;

        {
            let mut snapshot = self
                .snapshot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            snapshot.grid_layout =
                pb_02_grid_engine::insert(&self.grid, &snapshot.grid_layout, &pane_id, None);
            if !snapshot.active_modules.contains(&pane_id) {
                snapshot.active_modules.push(pane_id.clone());
            }
        }
        self.schedule_save();
        debug!(pane_id = %pane_id, "Pane added");
        Ok(pane_id)
    }

    /// Remove a pane from the layout, the active set and the registry.
    pub fn remove_pane(&self, pane_id: &str) -> bool {
        let removed = {
            let mut snapshot = self
                .snapshot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let had_pane = snapshot.grid_layout.find_item(pane_id).is_some()
                || snapshot.active_modules.iter().any(|id| id == pane_id);
            snapshot.grid_layout = pb_02_grid_engine::remove(&snapshot.grid_layout, pane_id);
            snapshot.active_modules.retain(|id| id != pane_id);
            had_pane
        };
        self.registry.unregister(pane_id);
        if removed {
            self.schedule_save();
            debug!(pane_id = %pane_id, "Pane removed");
        }
        removed
    }

    /// Resize a pane across every breakpoint, positions untouched.
    pub fn resize_pane(&self, pane_id: &str, size: Size) -> bool {
        let resized = {
            let mut snapshot = self
                .snapshot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if snapshot.grid_layout.find_item(pane_id).is_none() {
                return false;
            }
            snapshot.grid_layout = pb_02_grid_engine::resize(
                &snapshot.grid_layout,
                pane_id,
                Some(size.w),
                Some(size.h),
            );
            true
        };
        self.schedule_save();
        resized
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe to registry change events.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.registry.subscribe()
    }

    /// The registry backing this session.
    pub fn registry(&self) -> &Arc<PaneRegistry> {
        &self.registry
    }

    /// Persist the current snapshot immediately, bypassing the debounce.
    pub fn flush(&self) -> bool {
        let current = self.snapshot();
        self.sync.save_snapshot(&current)
    }

    // Trailing debounce: the first mutation in a burst arms one timer, the
    // save reads whatever state is current when it fires.
    fn schedule_save(&self) {
        if self.save_scheduled.swap(true, Ordering::SeqCst) {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            self.save_scheduled.store(false, Ordering::SeqCst);
            self.flush();
            return;
        };
        let scheduled = Arc::clone(&self.save_scheduled);
        let snapshot = Arc::clone(&self.snapshot);
        let sync = Arc::clone(&self.sync);
        let window = self.sync.config().save_debounce;
        handle.spawn(async move {
            tokio::time::sleep(window).await;
            scheduled.store(false, Ordering::SeqCst);
            let current = snapshot
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            if !sync.save_snapshot(&current) {
                warn!("Debounced snapshot save failed");
            }
        });
    }
}
