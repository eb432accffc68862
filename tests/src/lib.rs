//! # Paneboard Test Suite
//!
//! Unified test crate for cross-crate flows the per-crate unit tests
//! cannot cover.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── resolution_flows.rs   # Registry + resolver choreography
//!     ├── layout_flows.rs       # Grid placement + persistence boundary
//!     └── session_flows.rs      # Full session lifecycle end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pb-tests
//!
//! # By category
//! cargo test -p pb-tests integration::session_flows
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
