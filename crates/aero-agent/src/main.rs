//! Aero field agent — samples onboard environmental sensors and
//! publishes readings to the configured broker over mTLS MQTT.
//!
//! One attachment, one channel, one session per process run. On
//! unrecoverable transport loss the process tears down and exits; the
//! operator (or a service supervisor) restarts it.

use tracing_subscriber::EnvFilter;

use aero_agent::config::AgentConfig;
use aero_agent::indicator::{NullIndicator, StatusIndicator, SysfsLed};
use aero_agent::run;
use aero_net::NmcliStack;
use aero_sensors::{IioSensorBank, SensorBank, SyntheticSensorBank};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "aero-agent starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/aero/agent.toml".to_string());

    let config = AgentConfig::from_file(&config_path)?;
    tracing::info!(
        device_id = config.device_id,
        firmware = %config.firmware_version,
        broker = %config.broker.host,
        "config loaded"
    );

    // ── Hardware selection ──────────────────────────────────────
    let bank: Box<dyn SensorBank> = match IioSensorBank::discover() {
        Some(bank) => Box::new(bank),
        None => {
            tracing::warn!("no IIO sensor channels found, using synthetic readings");
            Box::new(SyntheticSensorBank::new())
        }
    };

    let indicator: Box<dyn StatusIndicator> = match &config.status_led_path {
        Some(path) => Box::new(SysfsLed::new(path)),
        None => Box::new(NullIndicator),
    };

    // ── Lifecycle ───────────────────────────────────────────────
    run::run_device(&config, NmcliStack::new(), bank, indicator).await?;

    tracing::info!("the device has been disconnected; restart the agent to resume publishing");
    Ok(())
}
