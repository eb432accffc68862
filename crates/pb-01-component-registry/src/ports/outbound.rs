//! # Outbound Ports
//!
//! Dependencies the resolver may be given by the host application.
//!
//! The loader capability carried by descriptors lives in `shared-types`
//! ([`UnitLoader`]); this module adds the host-level override strategy and
//! the in-memory adapters tests are built on.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{LoadError, ModuleType, Renderable, UnitLoader};

/// Host-supplied resolution override, consulted before descriptor loaders.
///
/// `Ok(None)` means "not mine, fall through to the catalog"; an error fails
/// the current attempt (a later call may retry).
#[async_trait]
pub trait GlobalResolver: Send + Sync {
    /// Try to resolve a unit for the given identifier.
    async fn resolve(
        &self,
        static_identifier: &str,
        module_type: ModuleType,
    ) -> Result<Option<Arc<dyn Renderable>>, LoadError>;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// Production resolvers are host-specific; in-memory implementations below
// back the unit and integration tests.
// =============================================================================

/// Minimal renderable unit carrying only its name.
#[derive(Debug, Clone)]
pub struct StaticUnit {
    name: String,
}

impl StaticUnit {
    /// Unit with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The unit boxed the way the registry stores it.
    pub fn shared(name: impl Into<String>) -> Arc<dyn Renderable> {
        Arc::new(Self::new(name))
    }
}

impl Renderable for StaticUnit {
    fn unit_name(&self) -> &str {
        &self.name
    }
}

/// Loader that counts invocations and optionally fails.
///
/// The call counter is what single-flight tests assert on: N concurrent
/// resolutions of one key must drive exactly one `load`.
pub struct CountingLoader {
    unit_name: String,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingLoader {
    /// Loader that succeeds with a [`StaticUnit`] of the given name.
    pub fn new(unit_name: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Loader that fails every call.
    pub fn failing(unit_name: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `load` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitLoader for CountingLoader {
    async fn load(&self) -> Result<Arc<dyn Renderable>, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers pile onto the in-flight entry.
        tokio::task::yield_now().await;
        if self.fail {
            Err(LoadError(format!("{} refused to load", self.unit_name)))
        } else {
            Ok(StaticUnit::shared(self.unit_name.clone()))
        }
    }
}
