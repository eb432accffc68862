//! # Persistence Tier Ports
//!
//! The remote tier speaks JSON over an async boundary; the cache tiers are
//! synchronous string key-value stores. Cache failures (quota, disabled
//! storage) degrade to `None`/`false` rather than erroring: persistence is
//! best-effort everywhere except the local save result.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use shared_types::LayoutSet;

use crate::domain::TransportError;

/// The remote session endpoint.
///
/// Implementations reject, they never hang: the synchronizer wraps every
/// fetch in its own deadline.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Fetch the stored session snapshot as raw JSON.
    async fn fetch_snapshot(&self) -> Result<serde_json::Value, TransportError>;

    /// Store the layout set.
    async fn put_layout(&self, layout: &LayoutSet) -> Result<(), TransportError>;

    /// Store the active module id list.
    async fn put_active_modules(&self, active: &[String]) -> Result<(), TransportError>;
}

/// A synchronous string key-value tier.
pub trait SnapshotCache: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value; `false` when the tier cannot accept the write.
    fn set(&self, key: &str, value: &str) -> bool;

    /// Remove a key; `true` when something was removed.
    fn remove(&self, key: &str) -> bool;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// Browser-backed tiers live in the host shell; the in-memory adapter backs
// tests and headless embedding.
// =============================================================================

/// Cache tier held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, String>>,
    read_only: bool,
}

impl InMemoryCache {
    /// Empty writable cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that refuses every write, the way a full or disabled storage
    /// area does.
    pub fn read_only() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            read_only: true,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        if self.read_only {
            return false;
        }
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        if self.read_only {
            return false;
        }
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }
}
