//! Device discovery: pick a host API, filter the raw device list, decode.

use tracing::{debug, warn};

use super::decode::{decode_fields, match_model};
use super::error::{DecodeFailure, DiscoveryError};
use super::types::{DecodedDevice, HostApiDescriptor, RawDeviceDescriptor};

/// The Windows host API that gives unmediated sample-rate and format control.
pub const KERNEL_STREAMING_HOST_API: &str = "Windows WDM-KS";

/// Read-only view of the platform's audio devices.
pub trait AudioSubsystem {
    fn host_apis(&self) -> Result<Vec<HostApiDescriptor>, DiscoveryError>;

    /// Every input endpoint, in enumeration order; the slice position is the
    /// device index used to reopen the endpoint.
    fn devices(&self) -> Result<Vec<RawDeviceDescriptor>, DiscoveryError>;

    /// Whether the kernel-streaming host API should be preferred.
    fn prefers_kernel_streaming(&self) -> bool {
        cfg!(target_os = "windows")
    }
}

/// How discovery chooses the host API whose devices are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostApiPreference {
    /// Kernel streaming on Windows, the first host API everywhere else.
    #[default]
    Platform,
    /// The host API with exactly this name.
    Named(String),
}

/// Index of the host API to filter devices by.
///
/// On kernel-streaming platforms this is the first API named
/// [`KERNEL_STREAMING_HOST_API`]; when none exists the result is
/// `host_apis.len()`, which matches no device. Elsewhere it is always 0.
pub fn select_host_api(kernel_streaming: bool, host_apis: &[HostApiDescriptor]) -> usize {
    if kernel_streaming {
        position_by_name(host_apis, KERNEL_STREAMING_HOST_API)
    } else {
        0
    }
}

fn position_by_name(host_apis: &[HostApiDescriptor], name: &str) -> usize {
    host_apis
        .iter()
        .position(|api| api.name == name)
        .unwrap_or(host_apis.len())
}

/// Everything one discovery pass produced, including per-device failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryReport {
    pub host_api_index: usize,
    pub devices: Vec<DecodedDevice>,
    pub failures: Vec<DecodeFailure>,
}

/// Decode every recognized device exposed through `host_api_index`.
///
/// Devices that fail to decode are collected in `failures`; the scan always
/// covers the whole list. Duplicate entries for the same hardware are kept.
pub fn scan_devices(raw_devices: &[RawDeviceDescriptor], host_api_index: usize) -> DiscoveryReport {
    let mut report = DiscoveryReport {
        host_api_index,
        ..DiscoveryReport::default()
    };
    for (device_index, raw) in raw_devices.iter().enumerate() {
        if raw.host_api_index != host_api_index {
            continue;
        }
        let Some((prefix, offset)) = match_model(&raw.name) else {
            continue;
        };
        match decode_fields(&raw.name, offset) {
            Ok(mut device) => {
                device.device_index = device_index;
                debug!(
                    device_index,
                    model = %device.model,
                    serial = %device.serial_number,
                    "decoded device"
                );
                report.devices.push(device);
            }
            Err(error) => {
                debug!(device_index, prefix, %error, "device name did not decode");
                report.failures.push(DecodeFailure {
                    device_index,
                    name: raw.name.clone(),
                    error,
                });
            }
        }
    }
    report
}

/// Decode the devices of the preferred host API and report failures.
pub fn discover_with_report(
    raw_devices: &[RawDeviceDescriptor],
    host_apis: &[HostApiDescriptor],
    kernel_streaming: bool,
) -> DiscoveryReport {
    scan_devices(raw_devices, select_host_api(kernel_streaming, host_apis))
}

/// Decoded devices of the preferred host API.
///
/// Per-device decode failures are logged and skipped. Fails with
/// [`DiscoveryError::NoDevicesFound`] only when nothing decoded.
pub fn discover(
    raw_devices: &[RawDeviceDescriptor],
    host_apis: &[HostApiDescriptor],
    kernel_streaming: bool,
) -> Result<Vec<DecodedDevice>, DiscoveryError> {
    finish(discover_with_report(raw_devices, host_apis, kernel_streaming))
}

/// Query `subsystem` and scan the devices of the host API `preference` picks.
pub fn scan_subsystem(
    subsystem: &dyn AudioSubsystem,
    preference: &HostApiPreference,
) -> Result<DiscoveryReport, DiscoveryError> {
    let host_apis = subsystem.host_apis()?;
    let host_api_index = match preference {
        HostApiPreference::Platform => {
            select_host_api(subsystem.prefers_kernel_streaming(), &host_apis)
        }
        HostApiPreference::Named(name) => position_by_name(&host_apis, name),
    };
    match host_apis.get(host_api_index) {
        Some(api) => debug!(host_api_index, host_api = %api.name, "selected host API"),
        None => warn!(
            host_api_index,
            available = host_apis.len(),
            "preferred host API is not available"
        ),
    }
    let raw_devices = subsystem.devices()?;
    Ok(scan_devices(&raw_devices, host_api_index))
}

/// Query `subsystem` and decode its devices using `preference`.
pub fn discover_devices(
    subsystem: &dyn AudioSubsystem,
    preference: &HostApiPreference,
) -> Result<Vec<DecodedDevice>, DiscoveryError> {
    finish(scan_subsystem(subsystem, preference)?)
}

/// Whether any host API carries the kernel-streaming name.
pub fn offers_kernel_streaming(host_apis: &[HostApiDescriptor]) -> bool {
    host_apis
        .iter()
        .any(|api| api.name == KERNEL_STREAMING_HOST_API)
}

fn finish(report: DiscoveryReport) -> Result<Vec<DecodedDevice>, DiscoveryError> {
    for failure in &report.failures {
        warn!(
            device_index = failure.device_index,
            name = %failure.name,
            error = %failure.error,
            "skipping device"
        );
    }
    if report.devices.is_empty() {
        return Err(DiscoveryError::NoDevicesFound {
            failures: report.failures,
        });
    }
    Ok(report.devices)
}
