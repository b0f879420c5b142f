//! Mock wireless stack for testing without radio hardware.
//!
//! Records association calls and supports scripted failures so the
//! provisioner and agent startup paths run in CI on any platform.

use async_trait::async_trait;

use crate::error::{NetError, NetResult};
use crate::stack::{LinkInfo, SecurityMode, WirelessStack};

/// A recorded association attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationCall {
    pub interface: String,
    pub ssid: String,
    pub passphrase: String,
    pub mode: SecurityMode,
}

/// Mock implementation of the `WirelessStack` trait.
pub struct MockWirelessStack {
    interface: Option<String>,
    association_failure: Option<i32>,
    link: LinkInfo,
    associations: Vec<AssociationCall>,
    disassociations: Vec<String>,
}

impl MockWirelessStack {
    /// Healthy stack: "wlan0" with a plausible MAC/IP on association.
    pub fn new() -> Self {
        Self {
            interface: Some("wlan0".into()),
            association_failure: None,
            link: LinkInfo {
                mac_address: "AA:BB:CC:DD:EE:FF".into(),
                ip_address: "192.168.1.50".into(),
            },
            associations: Vec::new(),
            disassociations: Vec::new(),
        }
    }

    /// No wireless hardware present.
    pub fn without_interface(mut self) -> Self {
        self.interface = None;
        self
    }

    /// Every association attempt fails with `code`.
    pub fn failing_association(mut self, code: i32) -> Self {
        self.association_failure = Some(code);
        self
    }

    /// Override the link details reported on success.
    pub fn with_link(mut self, mac: &str, ip: &str) -> Self {
        self.link = LinkInfo {
            mac_address: mac.into(),
            ip_address: ip.into(),
        };
        self
    }

    /// All recorded association attempts.
    pub fn associations(&self) -> &[AssociationCall] {
        &self.associations
    }

    /// Interfaces passed to `disassociate`.
    pub fn disassociations(&self) -> &[String] {
        &self.disassociations
    }
}

impl Default for MockWirelessStack {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WirelessStack for MockWirelessStack {
    async fn acquire_default(&mut self) -> NetResult<String> {
        self.interface.clone().ok_or(NetError::NoInterface)
    }

    async fn associate(
        &mut self,
        interface: &str,
        ssid: &str,
        passphrase: &str,
        mode: SecurityMode,
    ) -> NetResult<LinkInfo> {
        self.associations.push(AssociationCall {
            interface: interface.to_string(),
            ssid: ssid.to_string(),
            passphrase: passphrase.to_string(),
            mode,
        });
        match self.association_failure {
            Some(code) => Err(NetError::Association {
                ssid: ssid.to_string(),
                code,
            }),
            None => Ok(self.link.clone()),
        }
    }

    async fn disassociate(&mut self, interface: &str) -> NetResult<()> {
        self.disassociations.push(interface.to_string());
        Ok(())
    }
}
