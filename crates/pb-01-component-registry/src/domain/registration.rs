//! # Registration Records
//!
//! What the registry stores per key: the resolved unit, its classification,
//! and load metadata. Base registrations (2-part keys) cache "how to build
//! one of these"; instance registrations (3-part keys) are live panes.

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use shared_types::{ModuleType, Renderable};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Current wall-clock timestamp in milliseconds.
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// One resolved unit held by the registry.
#[derive(Clone)]
pub struct ComponentRegistration {
    /// Full registration key.
    pub key: String,
    /// The renderable unit itself.
    pub unit: Arc<dyn Renderable>,
    /// Classification the unit was registered under.
    pub module_type: ModuleType,
    /// Stable implementation name parsed from the key.
    pub static_identifier: String,
    /// Whether this is a live pane (3-part key) rather than a base cache.
    pub is_instance: bool,
    /// When the registration was created.
    pub registered_at: Timestamp,
}

impl fmt::Debug for ComponentRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistration")
            .field("key", &self.key)
            .field("unit", &self.unit.unit_name())
            .field("module_type", &self.module_type)
            .field("static_identifier", &self.static_identifier)
            .field("is_instance", &self.is_instance)
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// A stored load failure for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Failure description.
    pub message: String,
    /// When the failure was recorded.
    pub timestamp: Timestamp,
}

impl ErrorRecord {
    /// Record with the current timestamp.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: now_millis(),
        }
    }
}
