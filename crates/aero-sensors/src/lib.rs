//! Onboard sensor access.
//!
//! `SensorBank` abstracts the three environmental sensor drivers
//! (temperature, humidity, pressure). Three impls:
//! - `IioSensorBank` — Linux industrial-I/O sysfs channels
//! - `SyntheticSensorBank` — deterministic values for hosts without hardware
//! - `MockSensorBank` — scripted per-tick values (in `mock.rs`)
//!
//! `Sampler` bundles the three reads into one `TelemetrySample` per tick.

pub mod bank;
pub mod iio;
pub mod mock;
pub mod sampler;
pub mod synthetic;

pub use bank::SensorBank;
pub use iio::IioSensorBank;
pub use mock::MockSensorBank;
pub use sampler::Sampler;
pub use synthetic::SyntheticSensorBank;
