//! Secure channel and messaging session lifecycle.
//!
//! The two stateful layers between the network attachment and the publish
//! loop:
//! - `SecureChannel` — transport open, trust-material install, handshake;
//!   strictly ordered, no partial-success state observable to callers
//! - `Session` trait + `MqttSession` — session negotiation, per-tick
//!   protocol service, fire-and-forget publishing, orderly disconnect
//! - `MockSession` for testing without a broker

pub mod channel;
pub mod config;
pub mod error;
pub mod mock;
pub mod session;
pub mod trust;

pub use channel::SecureChannel;
pub use config::BrokerConfig;
pub use error::{ChannelError, ChannelResult, SessionError, SessionResult, TrustPart};
pub use mock::MockSession;
pub use session::{MqttSession, Session};
pub use trust::TrustMaterial;
