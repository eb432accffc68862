//! Application layer: the session orchestrator.

pub mod orchestrator;

pub use orchestrator::{BootReport, SessionOrchestrator};
