//! Host APIs and input devices as seen through CPAL.

use cpal::traits::{DeviceTrait, HostTrait};
use tracing::debug;

use crate::device::{
    offers_kernel_streaming, AudioSubsystem, DiscoveryError, HostApiDescriptor,
    RawDeviceDescriptor,
};

const UNNAMED_DEVICE: &str = "<unnamed input device>";

/// Enumerates every available CPAL host, in `cpal::available_hosts()` order.
///
/// Device indices run across all hosts: host 0's inputs first, then host 1's,
/// and so on. The same order is used to reopen a device for capture.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpalSubsystem;

impl CpalSubsystem {
    pub fn new() -> Self {
        Self
    }

    /// Input devices paired with the index of the host that exposes them.
    pub(crate) fn input_devices(&self) -> Result<Vec<(usize, cpal::Device)>, DiscoveryError> {
        let mut found = Vec::new();
        for (host_api_index, host_id) in cpal::available_hosts().into_iter().enumerate() {
            let host = match cpal::host_from_id(host_id) {
                Ok(host) => host,
                Err(err) => {
                    debug!(host = host_id.name(), %err, "audio host unavailable");
                    continue;
                }
            };
            append_host_devices(&mut found, host_api_index, host_id.name(), host.input_devices());
        }
        Ok(found)
    }
}

/// Add one host's inputs; a host that fails to list them is skipped.
fn append_host_devices<D, I, E>(
    found: &mut Vec<(usize, D)>,
    host_api_index: usize,
    host: &str,
    devices: Result<I, E>,
) where
    I: Iterator<Item = D>,
    E: std::fmt::Display,
{
    match devices {
        Ok(devices) => found.extend(devices.map(|device| (host_api_index, device))),
        Err(err) => debug!(host, %err, "audio host did not list input devices"),
    }
}

fn host_descriptors() -> Vec<HostApiDescriptor> {
    cpal::available_hosts()
        .into_iter()
        .map(|id| HostApiDescriptor::new(id.name()))
        .collect()
}

/// CPAL names its Windows hosts "WASAPI" and "ASIO"; the kernel-streaming
/// rule applies only when a host by that name is present.
pub(crate) fn kernel_streaming_preferred(platform: bool, host_apis: &[HostApiDescriptor]) -> bool {
    platform && offers_kernel_streaming(host_apis)
}

impl AudioSubsystem for CpalSubsystem {
    fn host_apis(&self) -> Result<Vec<HostApiDescriptor>, DiscoveryError> {
        Ok(host_descriptors())
    }

    fn prefers_kernel_streaming(&self) -> bool {
        kernel_streaming_preferred(cfg!(target_os = "windows"), &host_descriptors())
    }

    fn devices(&self) -> Result<Vec<RawDeviceDescriptor>, DiscoveryError> {
        let devices = self.input_devices()?;
        Ok(devices
            .into_iter()
            .map(|(host_api_index, device)| {
                let name = device.name().unwrap_or_else(|err| {
                    debug!(%err, "input device has no readable name");
                    UNNAMED_DEVICE.to_string()
                });
                RawDeviceDescriptor::new(name, host_api_index)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{discover_devices, HostApiPreference, StaticSubsystem};

    const SENSOR: &str = "Line (485B39 212345602560000256000220615)";

    #[test]
    fn windows_hosts_without_kernel_streaming_use_the_first_host() {
        let subsystem = StaticSubsystem::parse("WASAPI;ASIO", &format!("0:{SENSOR};1:{SENSOR}"))
            .unwrap();
        let preferred = kernel_streaming_preferred(true, &subsystem.host_apis);
        assert!(!preferred);
        let subsystem = StaticSubsystem {
            kernel_streaming: preferred,
            ..subsystem
        };
        let devices = discover_devices(&subsystem, &HostApiPreference::Platform).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_index, 0);
    }

    #[test]
    fn failing_host_is_skipped_during_enumeration() {
        let mut found = Vec::new();
        append_host_devices(&mut found, 0, "ALSA", Ok::<_, String>(["mic"].into_iter()));
        append_host_devices(
            &mut found,
            1,
            "JACK",
            Err::<std::vec::IntoIter<&str>, _>("server not running".to_string()),
        );
        append_host_devices(&mut found, 2, "Pulse", Ok::<_, String>(["a", "b"].into_iter()));
        assert_eq!(found, vec![(0, "mic"), (2, "a"), (2, "b")]);
    }

    #[test]
    fn kernel_streaming_host_is_preferred_when_present() {
        let apis = [
            HostApiDescriptor::new("MME"),
            HostApiDescriptor::new(crate::device::KERNEL_STREAMING_HOST_API),
        ];
        assert!(kernel_streaming_preferred(true, &apis));
        assert!(!kernel_streaming_preferred(false, &apis));
    }
}
