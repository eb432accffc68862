//! # PB-03 Session Sync
//!
//! Three-tier persistence synchronizer for board sessions.
//!
//! ## Tier precedence
//!
//! ```text
//! load:  remote (bounded timeout) → local cache → empty snapshot
//! save:  local (authoritative)    → session mirror → remote (spawned)
//! ```
//!
//! The remote tier is authoritative across devices but slow and flaky; the
//! local tier is the durable on-device fallback; the session tier mirrors
//! state for the lifetime of one shell session. Loads never error to the
//! caller, saves report only the local outcome.
//!
//! ## Consistency
//!
//! Last-write-wins per tier, no cross-writer locking. When tiers disagree
//! the remote wins on the next load; a load served from the local tier
//! pushes that state back to the remote once, re-seeding it.
//!
//! ## Module Structure
//!
//! ```text
//! pb-03-session-sync/
//! ├── config.rs        # Timeouts, storage keys, debounce window
//! ├── domain/          # Transport error taxonomy
//! ├── ports/           # RemoteSession + SnapshotCache, InMemoryCache
//! └── application/     # SessionSyncService
//! ```

#![warn(missing_docs)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::SessionSyncService;
pub use config::SyncConfig;
pub use domain::TransportError;
pub use ports::{InMemoryCache, RemoteSession, SnapshotCache};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
