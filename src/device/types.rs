use chrono::NaiveDate;
use serde::Serialize;

/// One input endpoint as reported by the audio subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeviceDescriptor {
    pub name: String,
    pub host_api_index: usize,
}

impl RawDeviceDescriptor {
    pub fn new(name: impl Into<String>, host_api_index: usize) -> Self {
        Self {
            name: name.into(),
            host_api_index,
        }
    }
}

/// A host audio API (WASAPI, ALSA, CoreAudio, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostApiDescriptor {
    pub name: String,
}

impl HostApiDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Physical quantity carried by a device's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    Acceleration,
    Voltage,
}

impl DataFormat {
    pub fn label(self) -> &'static str {
        match self {
            DataFormat::Acceleration => "acceleration",
            DataFormat::Voltage => "voltage",
        }
    }

    /// Unit of `scale` before any sensor sensitivity is applied.
    pub fn base_unit(self) -> &'static str {
        match self {
            DataFormat::Acceleration => "g",
            DataFormat::Voltage => "V",
        }
    }
}

/// Identification and calibration decoded from one device name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedDevice {
    /// Position in the full raw enumeration; pass it back to open the stream.
    pub device_index: usize,
    pub name: String,
    pub model: String,
    pub serial_number: String,
    pub calibration_date: NaiveDate,
    pub format: DataFormat,
    pub format_code: char,
    /// Counts per engineering unit, already corrected to a 1 V reference.
    pub sensitivity_raw: [u32; 2],
    /// Multiplier from a ±1.0 sample to engineering units, per channel.
    pub scale: [f32; 2],
}
