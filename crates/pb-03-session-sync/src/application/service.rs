//! # Session Sync Service
//!
//! Orchestrates the three persistence tiers. Loads degrade tier by tier and
//! never error to the caller; saves validate first, report the local tier's
//! outcome synchronously, and treat the session mirror and remote push as
//! best-effort.

use std::sync::Arc;

use pb_02_grid_engine::{normalize, validate_layout_value};
use shared_types::{LayoutSet, SessionSnapshot};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::ports::{RemoteSession, SnapshotCache};

/// The three-tier synchronizer.
pub struct SessionSyncService {
    remote: Option<Arc<dyn RemoteSession>>,
    local: Arc<dyn SnapshotCache>,
    session: Arc<dyn SnapshotCache>,
    config: SyncConfig,
}

impl SessionSyncService {
    /// Synchronizer over the two cache tiers, with no remote endpoint.
    pub fn new(local: Arc<dyn SnapshotCache>, session: Arc<dyn SnapshotCache>) -> Self {
        Self {
            remote: None,
            local,
            session,
            config: SyncConfig::default(),
        }
    }

    /// Attach the remote tier.
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RemoteSession>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Hydrate a snapshot, remote tier first.
    ///
    /// A snapshot served from the local tier is pushed back to the remote
    /// once, re-seeding an endpoint that lost or never had the session.
    pub async fn load_snapshot(&self) -> SessionSnapshot {
        if let Some(remote) = &self.remote {
            match timeout(self.config.remote_timeout, remote.fetch_snapshot()).await {
                Ok(Ok(value)) => {
                    let snapshot = snapshot_from_value(&value);
                    if !snapshot.grid_layout.is_empty() || !snapshot.active_modules.is_empty() {
                        debug!("Session hydrated from remote");
                        self.mirror_to_caches(&snapshot);
                        return snapshot;
                    }
                }
                Ok(Err(error)) => warn!(%error, "Remote session fetch failed"),
                Err(_) => warn!(
                    timeout_ms = self.config.remote_timeout.as_millis() as u64,
                    "Remote session fetch timed out"
                ),
            }
        }

        if let Some(snapshot) = self.load_from_local() {
            debug!("Session hydrated from local cache");
            self.spawn_remote_push(snapshot.clone());
            return snapshot;
        }

        debug!("No stored session; starting empty");
        SessionSnapshot::empty()
    }

    /// Persist a snapshot across the tiers.
    ///
    /// Returns the local tier's outcome; session and remote writes are
    /// attempted regardless and only logged.
    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) -> bool {
        if let Err(error) = snapshot.validate() {
            warn!(%error, "Rejecting snapshot save");
            return false;
        }
        let (layout_json, active_json) = match (
            serde_json::to_string(&snapshot.grid_layout),
            serde_json::to_string(&snapshot.active_modules),
        ) {
            (Ok(layout), Ok(active)) => (layout, active),
            _ => {
                warn!("Snapshot did not serialize; nothing written");
                return false;
            }
        };

        let stored = self.local.set(&self.config.layouts_key, &layout_json)
            && self
                .local
                .set(&self.config.active_modules_key, &active_json);
        if !stored {
            warn!("Local tier rejected the snapshot write");
        }
        if !self.session.set(&self.config.layouts_key, &layout_json)
            || !self
                .session
                .set(&self.config.active_modules_key, &active_json)
        {
            debug!("Session tier rejected the snapshot mirror");
        }
        self.spawn_remote_push(snapshot.clone());
        stored
    }

    /// Validate and persist a raw layout payload.
    ///
    /// Invalid payloads touch no tier. Valid ones are normalized into a
    /// typed snapshot and saved through [`Self::save_snapshot`].
    pub fn save_raw(&self, layout: &serde_json::Value, active: &[String]) -> bool {
        if let Err(error) = validate_layout_value(layout) {
            warn!(%error, "Rejecting raw layout save");
            return false;
        }
        let snapshot = SessionSnapshot {
            grid_layout: normalize(layout),
            active_modules: active.to_vec(),
        };
        self.save_snapshot(&snapshot)
    }

    /// Drop the stored session from both cache tiers.
    pub fn clear(&self) {
        for tier in [&self.local, &self.session] {
            tier.remove(&self.config.layouts_key);
            tier.remove(&self.config.active_modules_key);
        }
    }

    fn load_from_local(&self) -> Option<SessionSnapshot> {
        let raw_layout = self.local.get(&self.config.layouts_key)?;
        let value: serde_json::Value = match serde_json::from_str(&raw_layout) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, "Discarding unreadable local layout");
                return None;
            }
        };
        let grid_layout = normalize(&value);
        if grid_layout.is_empty() {
            return None;
        }
        let active_modules = self
            .local
            .get(&self.config.active_modules_key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Some(SessionSnapshot {
            grid_layout,
            active_modules,
        })
    }

    fn mirror_to_caches(&self, snapshot: &SessionSnapshot) {
        let (Ok(layout_json), Ok(active_json)) = (
            serde_json::to_string(&snapshot.grid_layout),
            serde_json::to_string(&snapshot.active_modules),
        ) else {
            return;
        };
        for tier in [&self.local, &self.session] {
            if !tier.set(&self.config.layouts_key, &layout_json)
                || !tier.set(&self.config.active_modules_key, &active_json)
            {
                debug!("Cache tier rejected the remote mirror");
            }
        }
    }

    fn spawn_remote_push(&self, snapshot: SessionSnapshot) {
        let Some(remote) = self.remote.clone() else {
            return;
        };
        // Outside a runtime there is nobody to push for; skip quietly.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime; skipping remote push");
            return;
        };
        handle.spawn(async move {
            if let Err(error) = remote.put_layout(&snapshot.grid_layout).await {
                warn!(%error, "Remote layout push failed");
            }
            if let Err(error) = remote.put_active_modules(&snapshot.active_modules).await {
                warn!(%error, "Remote active-module push failed");
            }
        });
    }
}

/// Lenient decode of a remote payload.
///
/// Accepts both the camelCase wire names and their snake_case legacy
/// aliases; anything unusable degrades to an empty field rather than an
/// error.
fn snapshot_from_value(value: &serde_json::Value) -> SessionSnapshot {
    let grid_layout = value
        .get("gridLayout")
        .or_else(|| value.get("grid_layout"))
        .map(normalize)
        .unwrap_or_else(LayoutSet::empty);
    let active_modules = value
        .get("activeModules")
        .or_else(|| value.get("active_modules"))
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    SessionSnapshot {
        grid_layout,
        active_modules,
    }
}
