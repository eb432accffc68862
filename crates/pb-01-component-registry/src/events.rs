//! # Registry Change Events
//!
//! Observer mechanism decoupling registry mutation from UI notification:
//! the registry broadcasts, subscribers re-query state at their own pace.
//! Only instance registrations emit events; base registrations are caches
//! and invisible to the UI.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::debug;

/// Maximum events buffered per subscriber before lag.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A change in the set of live pane registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A new live pane was registered under this key.
    InstanceRegistered {
        /// The 3-part registration key.
        key: String,
    },
    /// An existing live pane registration was overwritten.
    InstanceReplaced {
        /// The 3-part registration key.
        key: String,
    },
}

/// Broadcast side of the registry.
///
/// Uses `tokio::sync::broadcast` for multi-consumer semantics; a dropped
/// receiver simply stops receiving, and publishing with no subscribers is
/// not an error.
pub struct RegistryEvents {
    sender: broadcast::Sender<RegistryEvent>,
    events_published: AtomicU64,
}

impl RegistryEvents {
    /// Event bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Event bus with an explicit per-subscriber capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Publish an event; returns the number of subscribers that received it.
    pub fn publish(&self, event: RegistryEvent) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(event) {
            Ok(received_by) => received_by,
            Err(_) => {
                debug!("Registry event published with no subscribers");
                0
            }
        }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total events published since construction.
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for RegistryEvents {
    fn default() -> Self {
        Self::new()
    }
}
