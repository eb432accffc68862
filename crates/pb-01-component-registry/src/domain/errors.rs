//! # Resolution Errors
//!
//! Failures the resolver surfaces to its callers. The registry itself never
//! raises; these errors travel through [`crate::ResolverService`] so callers
//! can decide between retrying and showing an error state.
//!
//! All variants are `Clone`: concurrent callers of one in-flight resolution
//! each receive the same settled outcome.

use thiserror::Error;

/// A component resolution attempt failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Neither a pane id nor a composable key was supplied.
    #[error("Empty resolution key")]
    EmptyKey,

    /// The identifier does not parse as a pane key.
    #[error("Invalid pane identifier: {key}")]
    InvalidKey {
        /// The offending identifier.
        key: String,
    },

    /// The type segment names no recognized module type.
    #[error("Unknown module type: {0}")]
    UnknownModuleType(String),

    /// No resolution strategy produced a unit: the injected resolver yielded
    /// nothing and no matching descriptor carries a loader.
    #[error("No resolver available for {identifier}")]
    NoResolver {
        /// Static identifier that could not be resolved.
        identifier: String,
    },

    /// A resolution strategy was found but failed to produce a unit.
    #[error("Component load failed for {identifier}: {message}")]
    LoadFailed {
        /// Static identifier whose load failed.
        identifier: String,
        /// Underlying failure description.
        message: String,
    },
}
