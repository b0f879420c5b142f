//! Attachment acquisition and ownership.
//!
//! `NetworkProvisioner` drives the `WirelessStack` through acquire and a
//! single association attempt, then owns the resulting
//! `NetworkAttachment` for the rest of the process run. There is no retry
//! here: association failure is a pre-flight condition, fatal to startup.

use crate::attachment::NetworkAttachment;
use crate::error::{NetError, NetResult};
use crate::stack::{SecurityMode, WirelessStack};

/// Owns the wireless stack and, after association, the attachment.
pub struct NetworkProvisioner<S: WirelessStack> {
    stack: S,
    interface: Option<String>,
    attachment: Option<NetworkAttachment>,
}

impl<S: WirelessStack> NetworkProvisioner<S> {
    pub fn new(stack: S) -> Self {
        Self {
            stack,
            interface: None,
            attachment: None,
        }
    }

    /// Acquire the default wireless interface.
    pub async fn acquire(&mut self) -> NetResult<&str> {
        let interface = self.stack.acquire_default().await?;
        tracing::info!(%interface, "wireless interface acquired");
        Ok(self.interface.insert(interface).as_str())
    }

    /// Single association attempt on the acquired interface.
    ///
    /// On success the attachment exposes its hardware and assigned
    /// addresses for diagnostic reporting.
    pub async fn associate(
        &mut self,
        ssid: &str,
        passphrase: &str,
        mode: SecurityMode,
    ) -> NetResult<&NetworkAttachment> {
        let interface = self.interface.clone().ok_or(NetError::NoInterface)?;
        let link = self
            .stack
            .associate(&interface, ssid, passphrase, mode)
            .await?;
        tracing::info!(
            %interface,
            mac = %link.mac_address,
            ip = %link.ip_address,
            "associated"
        );
        Ok(&*self.attachment.insert(NetworkAttachment {
            interface,
            mac_address: link.mac_address,
            ip_address: link.ip_address,
        }))
    }

    /// The current attachment, if associated.
    pub fn attachment(&self) -> Option<&NetworkAttachment> {
        self.attachment.as_ref()
    }

    /// Tear the association down. Idempotent — a second call (or a call
    /// without a prior association) is a no-op.
    pub async fn disassociate(&mut self) -> NetResult<()> {
        match self.attachment.take() {
            Some(att) => {
                tracing::info!(interface = %att.interface, "disassociating");
                self.stack.disassociate(&att.interface).await
            }
            None => Ok(()),
        }
    }
}
