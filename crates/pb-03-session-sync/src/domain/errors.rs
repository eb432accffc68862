//! # Transport Errors
//!
//! Failures a [`crate::RemoteSession`] implementation may reject with.
//! Timeouts are the caller's concern; the port itself only distinguishes
//! reachability from payload problems.

use thiserror::Error;

/// A remote session operation failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint could not be reached or refused the request.
    #[error("Session endpoint unavailable: {0}")]
    Unavailable(String),

    /// The endpoint answered with something the synchronizer cannot use.
    #[error("Malformed session payload: {0}")]
    Protocol(String),
}
