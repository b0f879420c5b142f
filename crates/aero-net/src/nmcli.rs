//! NetworkManager-backed wireless stack.
//!
//! Drives `nmcli` with `tokio::process::Command` (no shell interpretation).
//! Association is a single attempt; the `nmcli` exit status becomes the
//! association error code. MAC and IP are read back with `-g` field
//! queries for the startup diagnostics report.

use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;

use crate::error::{NetError, NetResult};
use crate::stack::{LinkInfo, SecurityMode, WirelessStack};

/// Wireless stack over NetworkManager's `nmcli` CLI.
pub struct NmcliStack {
    nmcli_path: String,
}

impl NmcliStack {
    pub fn new() -> Self {
        Self {
            nmcli_path: "nmcli".into(),
        }
    }

    /// Use a non-default `nmcli` binary (containers, test rigs).
    pub fn with_binary(path: impl Into<String>) -> Self {
        Self {
            nmcli_path: path.into(),
        }
    }

    async fn run(&self, args: &[String]) -> NetResult<Output> {
        Command::new(&self.nmcli_path)
            .args(args)
            .output()
            .await
            .map_err(|e| NetError::Io(format!("failed to run {}: {e}", self.nmcli_path)))
    }

    async fn query_field(&self, field: &str, interface: &str) -> NetResult<String> {
        let args = field_query_args(field, interface);
        let output = self.run(&args).await?;
        if !output.status.success() {
            return Err(NetError::Query(format!(
                "nmcli -g {field} exited with {}",
                output.status
            )));
        }
        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(first_field_value(&raw))
    }
}

impl Default for NmcliStack {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WirelessStack for NmcliStack {
    async fn acquire_default(&mut self) -> NetResult<String> {
        let args = device_list_args();
        let output = self.run(&args).await?;
        if !output.status.success() {
            return Err(NetError::Query(format!(
                "nmcli device list exited with {}",
                output.status
            )));
        }
        let listing = String::from_utf8_lossy(&output.stdout);
        parse_wifi_device(&listing).ok_or(NetError::NoInterface)
    }

    async fn associate(
        &mut self,
        interface: &str,
        ssid: &str,
        passphrase: &str,
        mode: SecurityMode,
    ) -> NetResult<LinkInfo> {
        // NetworkManager negotiates the cipher suite from the AP beacon;
        // the configured mode is logged for diagnostics.
        tracing::debug!(ssid, interface, ?mode, "associating");

        let args = associate_args(ssid, passphrase, mode, interface);
        let output = self.run(&args).await?;
        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            tracing::warn!(
                ssid,
                code,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "association failed"
            );
            return Err(NetError::Association {
                ssid: ssid.to_string(),
                code,
            });
        }

        let mac_address = unescape_nmcli(&self.query_field("GENERAL.HWADDR", interface).await?);
        let ip_address = strip_prefix_len(&self.query_field("IP4.ADDRESS", interface).await?);
        Ok(LinkInfo {
            mac_address,
            ip_address,
        })
    }

    async fn disassociate(&mut self, interface: &str) -> NetResult<()> {
        let args = disconnect_args(interface);
        let output = self.run(&args).await?;
        if !output.status.success() {
            return Err(NetError::Query(format!(
                "nmcli device disconnect exited with {}",
                output.status
            )));
        }
        Ok(())
    }
}

// ── Argument builders & output parsers (pure, unit-tested) ─────

fn device_list_args() -> Vec<String> {
    vec!["-t".into(), "-f".into(), "DEVICE,TYPE".into(), "device".into()]
}

fn associate_args(ssid: &str, passphrase: &str, mode: SecurityMode, interface: &str) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "device".into(),
        "wifi".into(),
        "connect".into(),
        ssid.into(),
    ];
    if !matches!(mode, SecurityMode::Open) {
        args.push("password".into());
        args.push(passphrase.into());
    }
    args.push("ifname".into());
    args.push(interface.into());
    args
}

fn field_query_args(field: &str, interface: &str) -> Vec<String> {
    vec![
        "-g".into(),
        field.into(),
        "device".into(),
        "show".into(),
        interface.into(),
    ]
}

fn disconnect_args(interface: &str) -> Vec<String> {
    vec!["device".into(), "disconnect".into(), interface.into()]
}

/// Pick the first wifi-type device from `nmcli -t -f DEVICE,TYPE device`.
fn parse_wifi_device(listing: &str) -> Option<String> {
    listing.lines().find_map(|line| {
        let (device, kind) = line.split_once(':')?;
        (kind == "wifi").then(|| device.to_string())
    })
}

/// First line of a `-g` query result, trimmed.
fn first_field_value(raw: &str) -> String {
    raw.lines().next().unwrap_or("").trim().to_string()
}

/// `nmcli -g` escapes field-separator colons ("AA\:BB\:...").
fn unescape_nmcli(value: &str) -> String {
    value.replace("\\:", ":")
}

/// `IP4.ADDRESS` reports CIDR notation ("192.168.1.50/24").
fn strip_prefix_len(value: &str) -> String {
    value
        .split_once('/')
        .map(|(addr, _)| addr.to_string())
        .unwrap_or_else(|| value.to_string())
}
