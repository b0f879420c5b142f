//! Industrial-I/O (sysfs) sensor bank.
//!
//! Discovers the processed-value channels under `/sys/bus/iio/devices`
//! and scales them to the units the payload schema uses:
//! - `in_temp_input` — millidegree Celsius → °C
//! - `in_humidityrelative_input` — milli-percent → %RH
//! - `in_pressure_input` — kilopascal → hPa
//!
//! A failed read logs a warning and repeats the last good value; the
//! sensor contract has no error channel.

use std::path::{Path, PathBuf};

use crate::bank::SensorBank;

const IIO_ROOT: &str = "/sys/bus/iio/devices";

const TEMP_CHANNEL: &str = "in_temp_input";
const HUMIDITY_CHANNEL: &str = "in_humidityrelative_input";
const PRESSURE_CHANNEL: &str = "in_pressure_input";

struct Channel {
    path: PathBuf,
    scale: f64,
    last_good: f64,
}

impl Channel {
    fn new(path: PathBuf, scale: f64) -> Self {
        Self {
            path,
            scale,
            last_good: 0.0,
        }
    }

    fn read(&mut self) -> f64 {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "sensor read failed");
                return self.last_good;
            }
        };
        match raw.trim().parse::<f64>() {
            Ok(value) => {
                self.last_good = value * self.scale;
                self.last_good
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "sensor value unparsable");
                self.last_good
            }
        }
    }
}

/// Sensor bank over Linux IIO sysfs channels.
pub struct IioSensorBank {
    temperature: Channel,
    humidity: Channel,
    pressure: Channel,
}

impl IioSensorBank {
    /// Discover the three channels under the standard IIO root.
    /// Returns `None` unless all three are present.
    pub fn discover() -> Option<Self> {
        Self::discover_in(Path::new(IIO_ROOT))
    }

    /// Discovery against an alternate root (tests use a temp dir).
    pub fn discover_in(root: &Path) -> Option<Self> {
        let mut temperature = None;
        let mut humidity = None;
        let mut pressure = None;

        for entry in std::fs::read_dir(root).ok()?.flatten() {
            let device = entry.path();
            if !device.is_dir() {
                continue;
            }
            let temp_path = device.join(TEMP_CHANNEL);
            if temperature.is_none() && temp_path.is_file() {
                temperature = Some(Channel::new(temp_path, 0.001));
            }
            let hum_path = device.join(HUMIDITY_CHANNEL);
            if humidity.is_none() && hum_path.is_file() {
                humidity = Some(Channel::new(hum_path, 0.001));
            }
            let press_path = device.join(PRESSURE_CHANNEL);
            if pressure.is_none() && press_path.is_file() {
                pressure = Some(Channel::new(press_path, 10.0));
            }
        }

        match (temperature, humidity, pressure) {
            (Some(temperature), Some(humidity), Some(pressure)) => {
                tracing::info!(
                    temp = %temperature.path.display(),
                    hum = %humidity.path.display(),
                    press = %pressure.path.display(),
                    "IIO sensor channels discovered"
                );
                Some(Self {
                    temperature,
                    humidity,
                    pressure,
                })
            }
            _ => None,
        }
    }
}

impl SensorBank for IioSensorBank {
    fn read_temperature(&mut self) -> f64 {
        self.temperature.read()
    }

    fn read_humidity(&mut self) -> f64 {
        self.humidity.read()
    }

    fn read_pressure(&mut self) -> f64 {
        self.pressure.read()
    }
}
