use serde::{Deserialize, Serialize};

/// Process-wide device identity, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Numeric device identifier carried in every published payload.
    pub device_id: u32,
    /// Firmware/agent version string (reported in the startup banner).
    pub firmware_version: String,
}

impl DeviceIdentity {
    pub fn new(device_id: u32, firmware_version: impl Into<String>) -> Self {
        Self {
            device_id,
            firmware_version: firmware_version.into(),
        }
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "device {} (fw {})", self.device_id, self.firmware_version)
    }
}
