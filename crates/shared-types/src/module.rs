//! # Module Types and Descriptors
//!
//! The closed module-type classification, the descriptor shape produced by
//! the module catalog, and the capabilities a descriptor can carry.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pane_key::canonical_type;

/// Coarse classification of a pane's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModuleType {
    /// Built-in system-level panes.
    System,
    /// Panes backed by a monitored service.
    Service,
    /// User-defined panes.
    User,
}

impl ModuleType {
    /// All recognized module types, in catalog order.
    pub const ALL: [ModuleType; 3] = [ModuleType::System, ModuleType::Service, ModuleType::User];

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::System => "SYSTEM",
            ModuleType::Service => "SERVICE",
            ModuleType::User => "USER",
        }
    }

    /// Resolve a raw identifier (possibly a full key) to a module type.
    pub fn from_canonical(raw: &str) -> Option<Self> {
        match canonical_type(raw).as_str() {
            "SYSTEM" => Some(ModuleType::System),
            "SERVICE" => Some(ModuleType::Service),
            "USER" => Some(ModuleType::User),
            _ => None,
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string names no recognized module type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown module type: {0}")]
pub struct UnknownModuleType(pub String);

impl FromStr for ModuleType {
    type Err = UnknownModuleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_canonical(s).ok_or_else(|| UnknownModuleType(s.to_string()))
    }
}

/// An opaque renderable unit.
///
/// The shell never looks inside a unit; rendering is the host UI's concern.
/// Units travel as `Arc<dyn Renderable>` and live for the page lifetime.
pub trait Renderable: Send + Sync {
    /// Stable name of the unit implementation, for diagnostics.
    fn unit_name(&self) -> &str;
}

impl fmt::Debug for dyn Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderable")
            .field("unit_name", &self.unit_name())
            .finish()
    }
}

impl PartialEq for dyn Renderable {
    fn eq(&self, other: &Self) -> bool {
        self.unit_name() == other.unit_name()
    }
}

/// A unit loader failed to produce a renderable unit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unit load failed: {0}")]
pub struct LoadError(pub String);

/// Async capability to materialize a renderable unit.
///
/// Descriptors carry one of these; the resolver invokes it at most once per
/// in-flight resolution.
#[async_trait]
pub trait UnitLoader: Send + Sync {
    /// Load the unit this capability stands for.
    async fn load(&self) -> Result<Arc<dyn Renderable>, LoadError>;
}

/// Metadata for one discoverable unit, produced by the module catalog.
///
/// Immutable once fetched within a session; the registry stores defensive
/// clones so later catalog mutation cannot corrupt registry state.
#[derive(Clone)]
pub struct ModuleDescriptor {
    /// Classification of this unit.
    pub module_type: ModuleType,
    /// Stable implementation name.
    pub static_identifier: String,
    /// Optional human-readable name; also matched during descriptor lookup.
    pub name: Option<String>,
    /// Optional logo association.
    pub logo_url: Option<String>,
    /// Loader capability, when the catalog can build this unit itself.
    pub loader: Option<Arc<dyn UnitLoader>>,
}

impl ModuleDescriptor {
    /// Descriptor with only the required parts.
    pub fn new(module_type: ModuleType, static_identifier: impl Into<String>) -> Self {
        Self {
            module_type,
            static_identifier: static_identifier.into(),
            name: None,
            logo_url: None,
            loader: None,
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a logo URL.
    #[must_use]
    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    /// Attach a loader capability.
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn UnitLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Whether this descriptor answers to the given static identifier.
    ///
    /// Matches on `static_identifier` or, as the catalog sometimes labels
    /// entries, on `name`.
    pub fn matches(&self, static_identifier: &str) -> bool {
        self.static_identifier == static_identifier
            || self.name.as_deref() == Some(static_identifier)
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("module_type", &self.module_type)
            .field("static_identifier", &self.static_identifier)
            .field("name", &self.name)
            .field("logo_url", &self.logo_url)
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}
