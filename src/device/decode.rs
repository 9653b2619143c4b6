//! Model matching and field decoding for a single device name.

use chrono::NaiveDate;

use super::error::DecodeError;
use super::layout::{
    FieldLayout, Record, ACCELERATION_LAYOUT, FORMAT_CODE, MODEL, SERIAL_NUMBER,
    VOLTAGE_LAYOUT,
};
use super::types::{DataFormat, DecodedDevice};

/// Recognized model prefixes, in match priority order.
pub const MODEL_PREFIXES: [&str; 4] = ["485B", "333D", "633A", "SDC0"];

/// Full-scale code count of voltage devices at a 1 V reference (2^23).
pub const VOLTAGE_FULL_SCALE: f64 = 8_388_608.0;

/// Full-scale code count of acceleration devices.
pub const ACCELERATION_FULL_SCALE: f64 = 855_400.0;

/// Format `3` encodes sensitivity against a 50 mV reference.
const FIFTY_MV_TO_ONE_V: u32 = 20;

/// The single-character data format code stored in the device name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCode {
    /// `1`: samples are acceleration in g.
    Acceleration,
    /// `2`: samples are volts, 1 V reference.
    Voltage,
    /// `3`: samples are volts, sensitivity stored against 50 mV.
    VoltageFiftyMillivolt,
}

impl FormatCode {
    pub fn from_char(code: char) -> Result<Self, DecodeError> {
        match code {
            '1' => Ok(Self::Acceleration),
            '2' => Ok(Self::Voltage),
            '3' => Ok(Self::VoltageFiftyMillivolt),
            other => Err(DecodeError::UnrecognizedFormat { code: other }),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Acceleration => '1',
            Self::Voltage => '2',
            Self::VoltageFiftyMillivolt => '3',
        }
    }

    pub fn data_format(self) -> DataFormat {
        match self {
            Self::Acceleration => DataFormat::Acceleration,
            Self::Voltage | Self::VoltageFiftyMillivolt => DataFormat::Voltage,
        }
    }

    pub fn layout(self) -> &'static FieldLayout {
        match self {
            Self::Acceleration => &ACCELERATION_LAYOUT,
            Self::Voltage | Self::VoltageFiftyMillivolt => &VOLTAGE_LAYOUT,
        }
    }

    fn full_scale(self) -> f64 {
        match self {
            Self::Acceleration => ACCELERATION_FULL_SCALE,
            Self::Voltage | Self::VoltageFiftyMillivolt => VOLTAGE_FULL_SCALE,
        }
    }

    fn reference_multiplier(self) -> u32 {
        match self {
            Self::VoltageFiftyMillivolt => FIFTY_MV_TO_ONE_V,
            Self::Acceleration | Self::Voltage => 1,
        }
    }
}

/// First known model prefix found in `name`, with its byte offset.
///
/// Prefixes are tried in [`MODEL_PREFIXES`] order; the first one present
/// wins even when a later prefix appears earlier in the name.
pub fn match_model(name: &str) -> Option<(&'static str, usize)> {
    for prefix in MODEL_PREFIXES {
        if let Some(offset) = name.find(prefix) {
            return Some((prefix, offset));
        }
    }
    None
}

/// Decode the identification record that starts at byte `offset` of `name`.
///
/// The returned device carries `device_index` 0; discovery fills in the
/// enumeration position.
pub fn decode_fields(name: &str, offset: usize) -> Result<DecodedDevice, DecodeError> {
    let tail = name
        .get(offset..)
        .ok_or_else(|| DecodeError::malformed("model", "offset is outside the device name"))?;
    let record = Record::new(tail);

    let model = record.field("model", MODEL)?;
    let code = record
        .field("format", FORMAT_CODE)?
        .chars()
        .next()
        .ok_or_else(|| DecodeError::malformed("format", "empty format code"))?;
    let format_code = FormatCode::from_char(code)?;
    let layout = format_code.layout();
    record.ensure_len("record", layout.required_len())?;

    let serial_number = record.field("serial number", SERIAL_NUMBER)?;
    let multiplier = format_code.reference_multiplier();
    let mut sensitivity_raw = [0u32; 2];
    for (slot, span) in sensitivity_raw.iter_mut().zip(layout.sensitivity) {
        let counts = parse_sensitivity(record.field("sensitivity", span)?)?;
        *slot = counts.checked_mul(multiplier).ok_or_else(|| {
            DecodeError::malformed("sensitivity", "overflow after reference correction")
        })?;
    }
    let full_scale = format_code.full_scale();
    let scale = sensitivity_raw.map(|counts| (full_scale / f64::from(counts)) as f32);
    let calibration_date =
        parse_calibration_date(record.field("calibration date", layout.calibration_date)?)?;

    Ok(DecodedDevice {
        device_index: 0,
        name: name.to_string(),
        model: model.to_string(),
        serial_number: serial_number.to_string(),
        calibration_date,
        format: format_code.data_format(),
        format_code: format_code.as_char(),
        sensitivity_raw,
        scale,
    })
}

fn parse_sensitivity(digits: &str) -> Result<u32, DecodeError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::malformed(
            "sensitivity",
            format!("expected decimal digits, found {digits:?}"),
        ));
    }
    let counts: u32 = digits
        .parse()
        .map_err(|err| DecodeError::malformed("sensitivity", format!("{digits:?}: {err}")))?;
    if counts == 0 {
        return Err(DecodeError::malformed("sensitivity", "zero sensitivity"));
    }
    Ok(counts)
}

fn parse_calibration_date(text: &str) -> Result<NaiveDate, DecodeError> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::malformed(
            "calibration date",
            format!("expected YYMMDD, found {text:?}"),
        ));
    }
    NaiveDate::parse_from_str(text, "%y%m%d")
        .map_err(|err| DecodeError::malformed("calibration date", format!("{text:?}: {err}")))
}
