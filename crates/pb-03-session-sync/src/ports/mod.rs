//! Outbound ports for the persistence tiers, with the in-memory cache
//! adapter.

pub mod outbound;

pub use outbound::{InMemoryCache, RemoteSession, SnapshotCache};
