//! # PB-02 Grid Engine
//!
//! Pure placement engine for the responsive pane grid.
//!
//! ## Purpose
//!
//! Place, move, resize and remove panes without collision across five
//! independent column layouts, one per breakpoint. Everything here is a
//! side-effect-free function over a [`LayoutSet`] plus a [`GridConfig`]
//! column table.
//!
//! ## Guarantees
//!
//! | Guarantee | Description |
//! |-----------|-------------|
//! | No panics | Malformed input is coerced toward the nearest valid structure |
//! | Termination | First-fit placement always terminates via a bottom-row fallback |
//! | Completeness | [`normalize`] restores the every-breakpoint-present invariant |
//! | Purity | Operations return new layouts; inputs are never mutated |
//!
//! ## Module Structure
//!
//! ```text
//! pb-02-grid-engine/
//! ├── config.rs      # GridConfig: the single table of columns and sizes
//! └── engine.rs      # collides, first_fit, insert, remove, resize, normalize
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod engine;

pub use config::GridConfig;
pub use engine::{
    bottom_row, collides, count_items, first_fit, insert, normalize, remove, reorder_by_position,
    resize, validate_layout_value,
};

use shared_types::LayoutSet;

/// Re-exported layout types the engine operates on.
pub use shared_types::{Breakpoint, LayoutItem, LayoutValidationError, Size};

/// Convenience: an empty layout satisfying the all-breakpoints invariant.
pub fn empty_layout() -> LayoutSet {
    LayoutSet::empty()
}
