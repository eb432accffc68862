//! # PB-01 Component Registry
//!
//! Dynamic component resolution for the pane grid.
//!
//! ## Purpose
//!
//! Map opaque string identifiers to renderable units:
//! - registration, lookup and existence checks on the synchronous render
//!   hot path (the registry never raises)
//! - single-flight asynchronous resolution so concurrent requests for the
//!   same pane share one underlying load
//! - durable per-key error records for diagnostics
//!
//! ## Resolution order
//!
//! ```text
//! resolve(type, ident)
//!   ├── registry hit            → returned as-is (idempotent, O(1))
//!   ├── in-flight entry         → same shared future as the first caller
//!   ├── injected GlobalResolver → host-supplied override strategy
//!   └── descriptor UnitLoader   → catalog-supplied capability
//! ```
//!
//! A failed key is never blacklisted: the in-flight entry is dropped when a
//! resolution settles, so a later call retries from scratch.
//!
//! ## Module Structure
//!
//! ```text
//! pb-01-component-registry/
//! ├── domain/          # Registration records, error taxonomy
//! ├── ports/           # GlobalResolver port + test adapters
//! ├── application/     # PaneRegistry state, ResolverService single-flight
//! └── events.rs        # Broadcast change notifications
//! ```

#![warn(missing_docs)]

pub mod application;
pub mod domain;
pub mod events;
pub mod ports;

pub use application::{PaneRegistry, ResolverService};
pub use domain::{now_millis, ComponentRegistration, ErrorRecord, ResolveError, Timestamp};
pub use events::{RegistryEvent, RegistryEvents, DEFAULT_EVENT_CAPACITY};
pub use ports::{CountingLoader, GlobalResolver, StaticUnit};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
