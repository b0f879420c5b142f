//! Trust material for the mutually-authenticated channel.
//!
//! Three PEM-encoded credential blobs: root authority certificate, device
//! certificate, device private key. Loaded from the paths in
//! `BrokerConfig`; a read failure names the offending part.

use crate::config::BrokerConfig;
use crate::error::{ChannelError, ChannelResult, TrustPart};

/// The three credential blobs installed into the secure channel.
#[derive(Clone)]
pub struct TrustMaterial {
    pub ca_cert: Vec<u8>,
    pub client_cert: Vec<u8>,
    pub client_key: Vec<u8>,
}

impl TrustMaterial {
    pub fn new(
        ca_cert: impl Into<Vec<u8>>,
        client_cert: impl Into<Vec<u8>>,
        client_key: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            ca_cert: ca_cert.into(),
            client_cert: client_cert.into(),
            client_key: client_key.into(),
        }
    }

    /// Read the three PEM files named in the config.
    pub fn load(config: &BrokerConfig) -> ChannelResult<Self> {
        Ok(Self {
            ca_cert: read_pem(&config.ca_cert_path, TrustPart::CaCert)?,
            client_cert: read_pem(&config.client_cert_path, TrustPart::ClientCert)?,
            client_key: read_pem(&config.client_key_path, TrustPart::ClientKey)?,
        })
    }
}

impl std::fmt::Debug for TrustMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key bytes stay out of logs.
        f.debug_struct("TrustMaterial")
            .field("ca_cert_len", &self.ca_cert.len())
            .field("client_cert_len", &self.client_cert.len())
            .field("client_key_len", &self.client_key.len())
            .finish()
    }
}

fn read_pem(path: &str, part: TrustPart) -> ChannelResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| ChannelError::TrustMaterial {
        part,
        detail: format!("failed to read '{path}': {e}"),
    })
}
