//! Outbound ports for module discovery, with the static catalog adapter.

pub mod outbound;

pub use outbound::{CatalogError, ModuleCatalog, StaticCatalog};
