//! Conversion from a device's native unit to an attached sensor's unit.

use serde::Serialize;

use super::types::{DataFormat, DecodedDevice};

/// Sensitivity of a sensor wired to a voltage channel, in mV per unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSensitivity {
    pub millivolts_per_unit: f64,
    pub units: String,
}

impl SensorSensitivity {
    pub fn new(millivolts_per_unit: f64, units: impl Into<String>) -> Self {
        Self {
            millivolts_per_unit,
            units: units.into(),
        }
    }

    /// A sensitivity of zero leaves the channel in volts.
    pub fn is_applied(&self) -> bool {
        self.millivolts_per_unit != 0.0
    }
}

/// Final per-channel multiplier and the unit it produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelScale {
    pub factor: f32,
    pub units: String,
}

/// Scale factors for both channels of `device`.
///
/// Sensor sensitivities only apply to voltage devices; acceleration devices
/// always report g.
pub fn channel_scales(
    device: &DecodedDevice,
    sensors: &[Option<SensorSensitivity>; 2],
) -> [ChannelScale; 2] {
    let base_units = device.format.base_unit();
    [0, 1].map(|ch| {
        let factor = device.scale[ch];
        match (&sensors[ch], device.format) {
            (Some(sensor), DataFormat::Voltage) if sensor.is_applied() => ChannelScale {
                factor: (f64::from(factor) / (sensor.millivolts_per_unit / 1000.0)) as f32,
                units: sensor.units.clone(),
            },
            _ => ChannelScale {
                factor,
                units: base_units.to_string(),
            },
        }
    })
}
