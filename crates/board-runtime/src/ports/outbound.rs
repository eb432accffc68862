//! # Module Catalog Port
//!
//! Discovery of the units a board can host. The orchestrator fetches one
//! list per module type at boot; a failed fetch degrades to an empty list
//! so a partial catalog outage never blocks the session.

use async_trait::async_trait;
use shared_types::{ModuleDescriptor, ModuleType};
use thiserror::Error;

/// A catalog fetch failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog backend could not be reached.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Source of discoverable module descriptors.
#[async_trait]
pub trait ModuleCatalog: Send + Sync {
    /// Descriptors available for one module type.
    async fn fetch_descriptors(
        &self,
        module_type: ModuleType,
    ) -> Result<Vec<ModuleDescriptor>, CatalogError>;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// =============================================================================

/// Catalog over a fixed descriptor list, for tests and embedding.
#[derive(Default)]
pub struct StaticCatalog {
    descriptors: Vec<ModuleDescriptor>,
}

impl StaticCatalog {
    /// Catalog serving the given descriptors.
    pub fn new(descriptors: Vec<ModuleDescriptor>) -> Self {
        Self { descriptors }
    }
}

#[async_trait]
impl ModuleCatalog for StaticCatalog {
    async fn fetch_descriptors(
        &self,
        module_type: ModuleType,
    ) -> Result<Vec<ModuleDescriptor>, CatalogError> {
        Ok(self
            .descriptors
            .iter()
            .filter(|descriptor| descriptor.module_type == module_type)
            .cloned()
            .collect())
    }
}
