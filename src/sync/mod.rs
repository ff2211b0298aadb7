//! Synchronization with the layout resolver
//!
//! The client ships everything it knows to a resolver and replaces its
//! state with whatever comes back. [`protocol`] defines the wire shapes,
//! [`resolver`] the transports, [`cache`] and [`transfer`] the two ways a
//! snapshot leaves the session.

pub mod cache;
pub mod protocol;
pub mod resolver;
pub mod transfer;

pub use cache::{CacheError, LocalCache};
pub use protocol::{Action, LayoutPayload, LayoutRequest, LayoutResponse};
pub use resolver::{HttpResolver, LocalResolver, Resolver};
pub use transfer::TransferError;

use thiserror::Error;

/// Errors from a resolver round trip
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    /// The request never got a response
    #[error("resolver unreachable: {0}")]
    Network(String),

    /// The resolver answered with a non-success status
    #[error("resolver returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body is not a layout
    #[error("invalid resolver response: {0}")]
    Decode(String),

    /// The resolver refused the layout, e.g. because of a constraint cycle
    #[error("layout rejected: {0}")]
    Rejected(String),
}
