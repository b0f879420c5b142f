//! Channel and session error types.

use thiserror::Error;

/// Which trust-material blob a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustPart {
    CaCert,
    ClientCert,
    ClientKey,
}

impl std::fmt::Display for TrustPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrustPart::CaCert => "CA certificate",
            TrustPart::ClientCert => "client certificate",
            TrustPart::ClientKey => "client key",
        };
        f.write_str(name)
    }
}

/// Errors from secure-channel establishment.
///
/// Each establishment step has its own kind; an out-of-order call fails
/// with the kind of the step that was attempted.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("transport open failed (code {code}): {detail}")]
    TransportOpen { code: i32, detail: String },

    #[error("trust material rejected ({part}): {detail}")]
    TrustMaterial { part: TrustPart, detail: String },

    #[error("handshake failed (code {code}): {detail}")]
    Handshake { code: i32, detail: String },

    #[error("channel is not connected")]
    NotConnected,
}

/// Convenience alias for channel results.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors from the messaging session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Session negotiation was rejected or never completed. `code` is the
    /// broker's CONNACK return code when one was received, 0 otherwise.
    #[error("session connect failed (code {code}): {detail}")]
    Connect { code: u8, detail: String },

    /// The transport reported loss or a protocol violation during a
    /// service tick. The session is Disconnected afterwards.
    #[error("session lost: {0}")]
    Lost(String),

    /// A publish could not be handed to the transport. Non-fatal — the
    /// session's liveness is unchanged.
    #[error("publish failed: {0}")]
    Publish(String),

    #[error("session is not connected")]
    NotConnected,
}

/// Convenience alias for session results.
pub type SessionResult<T> = Result<T, SessionError>;
