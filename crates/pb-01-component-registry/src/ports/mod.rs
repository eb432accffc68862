//! Port traits for external collaborators, with in-memory test adapters.

pub mod outbound;

pub use outbound::{CountingLoader, GlobalResolver, StaticUnit};
