use serde::Deserialize;

/// Broker connection configuration, loadable from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Broker hostname.
    pub host: String,
    /// Broker port (default 8883 for TLS).
    #[serde(default = "default_port")]
    pub port: u16,
    /// MQTT client ID (unique per device).
    pub client_id: String,
    /// Topic the telemetry payload is published on.
    pub topic: String,
    /// Enable TLS (mTLS). When false, connects plaintext (local dev).
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    /// Path to the root authority certificate (PEM).
    #[serde(default)]
    pub ca_cert_path: String,
    /// Path to the device X.509 certificate (PEM).
    #[serde(default)]
    pub client_cert_path: String,
    /// Path to the device private key (PEM).
    #[serde(default)]
    pub client_key_path: String,
    /// Keep-alive interval in seconds.
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u16,
    /// How long session negotiation may take before aborting startup.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_port() -> u16 {
    8883
}

fn default_use_tls() -> bool {
    true
}

fn default_keepalive() -> u16 {
    60
}

fn default_connect_timeout() -> u64 {
    30
}
