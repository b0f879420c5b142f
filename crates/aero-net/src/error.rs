//! Network provisioning error types.

use thiserror::Error;

/// Errors from attachment acquisition and association.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("no compatible wireless interface found")]
    NoInterface,

    #[error("association with '{ssid}' failed (code {code})")]
    Association { ssid: String, code: i32 },

    #[error("interface query failed: {0}")]
    Query(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Convenience alias for provisioning results.
pub type NetResult<T> = Result<T, NetError>;
