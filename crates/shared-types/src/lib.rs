//! # Shared Types Crate
//!
//! Domain types shared across all paneboard subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types are defined here.
//! - **Keys are derivable**: every pane identifier can be rebuilt from its
//!   parts through the codec in [`pane_key`], and parsed back losslessly.
//! - **Layouts are always complete**: a [`LayoutSet`] carries every
//!   recognized breakpoint by construction; consumers never see a missing
//!   or non-sequence breakpoint.

pub mod layout;
pub mod module;
pub mod pane_key;

pub use layout::{
    Breakpoint, LayoutItem, LayoutSet, LayoutValidationError, SessionSnapshot, Size,
};
pub use module::{LoadError, ModuleDescriptor, ModuleType, Renderable, UnitLoader, UnknownModuleType};
pub use pane_key::{canonical_type, compose_key, is_instance_key, ParsedPaneId};
