//! Core registry types: registration records and the error taxonomy.

pub mod errors;
pub mod registration;

pub use errors::ResolveError;
pub use registration::{now_millis, ComponentRegistration, ErrorRecord, Timestamp};
