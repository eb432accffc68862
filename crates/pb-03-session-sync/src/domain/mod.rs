//! Domain types for the synchronizer.

pub mod errors;

pub use errors::TransportError;
