//! # Board Runtime
//!
//! Wires the board subsystems into one session: catalog discovery,
//! component resolution, grid placement and persistence.
//!
//! ## Session lifecycle
//!
//! ```text
//! boot()
//!   ├── fetch catalog per module type   (failures degrade to empty lists)
//!   ├── seed the registry descriptors
//!   ├── hydrate the snapshot            (remote → local → empty)
//!   └── resolve every active pane       (concurrently, partial failure ok)
//! add_pane / remove_pane / resize_pane
//!   └── mutate layout + active set, debounced persistence
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! board-runtime/
//! ├── ports/           # ModuleCatalog port + StaticCatalog adapter
//! └── application/     # SessionOrchestrator, BootReport
//! ```

#![warn(missing_docs)]

pub mod application;
pub mod ports;

pub use application::{BootReport, SessionOrchestrator};
pub use board_telemetry::{TelemetryConfig, TelemetryError};
pub use ports::{CatalogError, ModuleCatalog, StaticCatalog};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install logging from environment configuration.
///
/// Convenience for embedders without their own subscriber; equivalent to
/// [`board_telemetry::init_telemetry`] with [`TelemetryConfig::from_env`].
pub fn init_logging() -> Result<(), TelemetryError> {
    board_telemetry::init_telemetry(&TelemetryConfig::from_env())
}
