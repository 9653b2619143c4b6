//! Discovery and decoding of vendor USB audio data-acquisition devices.
//!
//! Compatible devices encode their model, serial number, data format,
//! per-channel sensitivity, and calibration date at fixed character offsets
//! inside the name the operating system reports. This module finds those
//! devices in a raw enumeration and turns each name into a [`DecodedDevice`]
//! whose `scale` converts a ±1.0 float sample into volts or g.
//!
//! Nothing here touches audio hardware; enumeration comes in through the
//! [`AudioSubsystem`] trait.

mod decode;
mod discover;
mod error;
mod fixture;
mod layout;
mod types;
mod units;

pub use decode::{
    decode_fields, match_model, FormatCode, ACCELERATION_FULL_SCALE, MODEL_PREFIXES,
    VOLTAGE_FULL_SCALE,
};
pub use discover::{
    discover, discover_devices, discover_with_report, offers_kernel_streaming, scan_devices,
    scan_subsystem, select_host_api, AudioSubsystem, DiscoveryReport, HostApiPreference, KERNEL_STREAMING_HOST_API,
};
pub use error::{DecodeError, DecodeFailure, DiscoveryError};
pub use fixture::{StaticSubsystem, TEST_DEVICES_ENV, TEST_HOST_APIS_ENV};
pub use layout::{FieldLayout, FieldSpan, ACCELERATION_LAYOUT, VOLTAGE_LAYOUT};
pub use types::{DataFormat, DecodedDevice, HostApiDescriptor, RawDeviceDescriptor};
pub use units::{channel_scales, ChannelScale, SensorSensitivity};
