//! Per-tick sample capture.

use chrono::Utc;

use aero_protocol::TelemetrySample;

use crate::bank::SensorBank;

/// Bundles the three sensor reads into one `TelemetrySample` per tick.
///
/// The reads are sequential and need not be mutually consistent across a
/// hardware fault; the bundle is treated as a single reading unit for
/// message composition.
pub struct Sampler<B: SensorBank> {
    bank: B,
}

impl<B: SensorBank> Sampler<B> {
    pub fn new(bank: B) -> Self {
        Self { bank }
    }

    /// Capture one sample.
    pub fn sample(&mut self) -> TelemetrySample {
        let sample = TelemetrySample {
            temperature: self.bank.read_temperature(),
            humidity: self.bank.read_humidity(),
            pressure: self.bank.read_pressure(),
            sampled_at: Utc::now(),
        };
        tracing::debug!(
            temp = sample.temperature,
            hum = sample.humidity,
            press = sample.pressure,
            "sample captured"
        );
        sample
    }

    /// Access the underlying bank (tests inspect mocks through this).
    pub fn bank(&self) -> &B {
        &self.bank
    }
}
