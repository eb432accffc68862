//! Cross-crate integration flows.

pub mod layout_flows;
pub mod resolution_flows;
pub mod session_flows;
