//! Agent configuration, loadable from TOML.

use std::time::Duration;

use serde::Deserialize;

use aero_channel::BrokerConfig;
use aero_net::SecurityMode;

/// Wireless network credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct WifiConfig {
    pub ssid: String,
    pub passphrase: String,
    #[serde(default)]
    pub security: SecurityMode,
}

/// Top-level configuration for the field agent.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Numeric device identifier carried in every payload.
    pub device_id: u32,
    /// Firmware version string for the startup banner.
    pub firmware_version: String,
    /// Interval between publish ticks, in milliseconds.
    #[serde(default = "default_publish_interval")]
    pub publish_interval_ms: u64,
    /// Sysfs LED used as the busy indicator. None disables it.
    #[serde(default)]
    pub status_led_path: Option<String>,
    /// Wireless credentials.
    pub wifi: WifiConfig,
    /// Broker connection settings.
    pub broker: BrokerConfig,
}

fn default_publish_interval() -> u64 {
    10_000
}

impl AgentConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn publish_interval(&self) -> Duration {
        Duration::from_millis(self.publish_interval_ms)
    }
}
