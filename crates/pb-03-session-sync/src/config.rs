//! Synchronizer tunables: remote deadline, storage keys, save coalescing.

use std::time::Duration;

/// Storage key for the serialized layout set.
pub const DEFAULT_LAYOUTS_KEY: &str = "paneboard.layouts";
/// Storage key for the active module id list.
pub const DEFAULT_ACTIVE_MODULES_KEY: &str = "paneboard.active_modules";

/// Configuration for [`crate::SessionSyncService`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Deadline applied to every remote fetch.
    pub remote_timeout: Duration,
    /// Cache key under which the layout set is stored.
    pub layouts_key: String,
    /// Cache key under which active module ids are stored.
    pub active_modules_key: String,
    /// Window within which successive saves coalesce into one.
    pub save_debounce: Duration,
}

impl SyncConfig {
    /// Replace the remote fetch deadline.
    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Replace the save coalescing window.
    #[must_use]
    pub fn with_save_debounce(mut self, window: Duration) -> Self {
        self.save_debounce = window;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_timeout: Duration::from_secs(5),
            layouts_key: DEFAULT_LAYOUTS_KEY.to_string(),
            active_modules_key: DEFAULT_ACTIVE_MODULES_KEY.to_string(),
            save_debounce: Duration::from_millis(250),
        }
    }
}
