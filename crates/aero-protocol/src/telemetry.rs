//! Telemetry value types and the published wire schema.
//!
//! `TelemetrySample` is one synchronous capture of the three onboard
//! sensors; `TelemetryMessage` is the flat JSON object published to the
//! broker. The wire schema is fixed — field order and spelling must not
//! change without a fleet-wide consumer migration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::DeviceIdentity;

/// One capture of the onboard sensors, bundled as a unit per loop tick.
///
/// `sampled_at` is diagnostic only — it is logged, never published.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Barometric pressure in hectopascal.
    pub pressure: f64,
    /// When the capture happened.
    pub sampled_at: DateTime<Utc>,
}

/// The published payload: `{"deviceId":1,"temp":21.5,"hum":40.0,"press":1012.3}`.
///
/// Serde field order is the wire order; numbers render in default decimal
/// text form with no extra whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMessage {
    pub device_id: u32,
    pub temp: f64,
    pub hum: f64,
    pub press: f64,
}

impl TelemetryMessage {
    /// Compose a message from the device identity and one sample.
    ///
    /// Pure — equal inputs produce a byte-identical rendering.
    pub fn compose(identity: &DeviceIdentity, sample: &TelemetrySample) -> Self {
        Self {
            device_id: identity.device_id,
            temp: sample.temperature,
            hum: sample.humidity,
            press: sample.pressure,
        }
    }

    /// Render the wire payload.
    pub fn render(&self) -> String {
        serde_json::to_string(self).expect("flat numeric struct serializes")
    }
}
