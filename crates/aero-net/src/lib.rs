//! Wireless network provisioning.
//!
//! Provides the attachment-acquisition layer for the telemetry node:
//! - `WirelessStack` trait over the platform network stack (mockable)
//! - `NmcliStack` production impl (NetworkManager via `nmcli`)
//! - `NetworkProvisioner` — owns the acquired `NetworkAttachment`
//! - `MockWirelessStack` for testing without radio hardware

pub mod attachment;
pub mod error;
pub mod mock;
pub mod nmcli;
pub mod provisioner;
pub mod stack;

pub use attachment::NetworkAttachment;
pub use error::{NetError, NetResult};
pub use mock::MockWirelessStack;
pub use nmcli::NmcliStack;
pub use provisioner::NetworkProvisioner;
pub use stack::{LinkInfo, SecurityMode, WirelessStack};
