//! Wireless stack abstraction.
//!
//! `WirelessStack` is the seam over the platform network stack so the
//! provisioner can be exercised without radio hardware. Two impls:
//! - `NmcliStack` — NetworkManager via `nmcli` (in `nmcli.rs`)
//! - `MockWirelessStack` — scripted outcomes (in `mock.rs`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NetResult;

/// Wireless security mode requested for association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityMode {
    Open,
    Wpa2,
    WpaWpa2,
    Wpa3,
}

impl Default for SecurityMode {
    fn default() -> Self {
        Self::WpaWpa2
    }
}

/// Link-level details reported by the stack after a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    pub mac_address: String,
    pub ip_address: String,
}

/// Trait over the platform wireless stack.
#[async_trait]
pub trait WirelessStack: Send {
    /// Find the default wireless interface. Returns its name, or
    /// `NetError::NoInterface` when no compatible hardware is present.
    async fn acquire_default(&mut self) -> NetResult<String>;

    /// Perform a single credentialed join on `interface`. Any non-zero
    /// underlying status becomes `NetError::Association { code }`.
    async fn associate(
        &mut self,
        interface: &str,
        ssid: &str,
        passphrase: &str,
        mode: SecurityMode,
    ) -> NetResult<LinkInfo>;

    /// Drop the association. Safe to call on an already-down link.
    async fn disassociate(&mut self, interface: &str) -> NetResult<()>;
}
