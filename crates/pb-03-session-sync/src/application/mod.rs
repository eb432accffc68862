//! Application service tying the persistence tiers together.

pub mod service;

pub use service::SessionSyncService;
