//! Staged device lifecycle: provision → establish → connect → loop →
//! teardown.
//!
//! Each stage is an independently callable function with injectable
//! collaborators so tests can substitute fakes for the radio, the
//! broker, and the sensors. Startup-phase failures abort with context
//! naming the phase; teardown steps are best-effort and only logged.

use anyhow::Context;

use aero_channel::{BrokerConfig, MqttSession, SecureChannel, Session, TrustMaterial};
use aero_net::{NetworkAttachment, NetworkProvisioner, WirelessStack};
use aero_protocol::DeviceIdentity;
use aero_sensors::{Sampler, SensorBank};

use crate::config::{AgentConfig, WifiConfig};
use crate::indicator::StatusIndicator;
use crate::publish_loop;

/// Acquire the attachment and perform the single association attempt.
pub async fn provision<W: WirelessStack>(
    provisioner: &mut NetworkProvisioner<W>,
    wifi: &WifiConfig,
) -> anyhow::Result<()> {
    provisioner
        .acquire()
        .await
        .context("attachment acquisition failed")?;
    let attachment = provisioner
        .associate(&wifi.ssid, &wifi.passphrase, wifi.security)
        .await
        .context("association failed")?;
    tracing::info!(
        mac = %attachment.mac_address,
        ip = %attachment.ip_address,
        "network attached"
    );
    Ok(())
}

/// Establish the secure channel: open, install trust, handshake — in
/// that order, each step gated on the previous one.
pub async fn establish(
    attachment: &NetworkAttachment,
    broker: &BrokerConfig,
) -> anyhow::Result<SecureChannel> {
    let mut channel = if broker.use_tls {
        SecureChannel::new()
    } else {
        tracing::info!("plaintext channel mode (no TLS)");
        SecureChannel::plaintext()
    };

    channel
        .open_transport(attachment)
        .context("transport open failed")?;
    if broker.use_tls {
        let material = TrustMaterial::load(broker).context("trust material load failed")?;
        channel
            .install_trust_material(material)
            .context("trust material install failed")?;
    }
    channel
        .handshake(&broker.host, broker.port)
        .await
        .context("handshake failed")?;
    Ok(channel)
}

/// Negotiate the messaging session over the connected channel.
pub async fn connect(
    channel: &SecureChannel,
    broker: &BrokerConfig,
) -> anyhow::Result<MqttSession> {
    MqttSession::connect(channel, broker)
        .await
        .context("session connect failed")
}

/// Orderly teardown. Every step is best-effort: the process is already
/// on its way out, so failures are logged and ignored.
pub async fn teardown<S: Session, W: WirelessStack>(
    session: &mut S,
    channel: &mut SecureChannel,
    provisioner: &mut NetworkProvisioner<W>,
) {
    if session.is_connected() {
        if let Err(e) = session.disconnect().await {
            tracing::warn!(error = %e, "disconnect failed");
        }
    }
    channel.close();
    if let Err(e) = provisioner.disassociate().await {
        tracing::warn!(error = %e, "disassociation failed");
    }
    tracing::info!("teardown complete");
}

/// The whole device lifecycle for one process run.
pub async fn run_device<W, B, I>(
    config: &AgentConfig,
    stack: W,
    bank: B,
    mut indicator: I,
) -> anyhow::Result<()>
where
    W: WirelessStack,
    B: SensorBank,
    I: StatusIndicator,
{
    let identity = DeviceIdentity::new(config.device_id, config.firmware_version.clone());
    let mut provisioner = NetworkProvisioner::new(stack);

    indicator.busy();
    provision(&mut provisioner, &config.wifi).await?;

    let mut channel = {
        let attachment = provisioner
            .attachment()
            .context("no attachment after association")?;
        establish(attachment, &config.broker).await?
    };

    let mut session = connect(&channel, &config.broker).await?;
    indicator.idle();

    tracing::info!(topic = %config.broker.topic, "entering publish loop");
    let mut sampler = Sampler::new(bank);
    let exit = publish_loop::run(
        &mut session,
        &mut sampler,
        &mut indicator,
        &identity,
        &config.broker.topic,
        config.publish_interval(),
    )
    .await;
    tracing::warn!(
        reason = ?exit.reason,
        ticks = exit.ticks,
        published = exit.published,
        publish_failures = exit.publish_failures,
        "publish loop exited"
    );

    teardown(&mut session, &mut channel, &mut provisioner).await;
    Ok(())
}
