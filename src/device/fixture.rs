//! In-memory audio subsystem for runs without hardware.

use std::env;

use super::discover::AudioSubsystem;
use super::error::DiscoveryError;
use super::types::{HostApiDescriptor, RawDeviceDescriptor};

/// Semicolon-separated `host_api_index:name` entries.
pub const TEST_DEVICES_ENV: &str = "DIGIDAQ_TEST_DEVICES";
/// Semicolon-separated host API names.
pub const TEST_HOST_APIS_ENV: &str = "DIGIDAQ_TEST_HOST_APIS";

/// A fixed device list that answers discovery queries.
#[derive(Debug, Clone, Default)]
pub struct StaticSubsystem {
    pub host_apis: Vec<HostApiDescriptor>,
    pub devices: Vec<RawDeviceDescriptor>,
    pub kernel_streaming: bool,
}

impl StaticSubsystem {
    /// Build the fixture from the test environment variables, if set.
    pub fn from_env() -> Option<Result<Self, DiscoveryError>> {
        let devices = env::var(TEST_DEVICES_ENV).ok()?;
        let host_apis = env::var(TEST_HOST_APIS_ENV).unwrap_or_default();
        Some(Self::parse(&host_apis, &devices))
    }

    pub fn parse(host_apis: &str, devices: &str) -> Result<Self, DiscoveryError> {
        let mut host_apis: Vec<HostApiDescriptor> = split_entries(host_apis)
            .map(HostApiDescriptor::new)
            .collect();
        if host_apis.is_empty() {
            host_apis.push(HostApiDescriptor::new("Fixture"));
        }
        let devices = split_entries(devices)
            .map(parse_device)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            host_apis,
            devices,
            kernel_streaming: false,
        })
    }
}

fn split_entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|item| !item.is_empty())
}

fn parse_device(entry: &str) -> Result<RawDeviceDescriptor, DiscoveryError> {
    let (api, name) = entry.split_once(':').ok_or_else(|| {
        DiscoveryError::Enumeration(format!("fixture entry {entry:?} is not host_api:name"))
    })?;
    let host_api_index = api.trim().parse::<usize>().map_err(|err| {
        DiscoveryError::Enumeration(format!("fixture host API index {api:?}: {err}"))
    })?;
    Ok(RawDeviceDescriptor::new(name, host_api_index))
}

impl AudioSubsystem for StaticSubsystem {
    fn host_apis(&self) -> Result<Vec<HostApiDescriptor>, DiscoveryError> {
        Ok(self.host_apis.clone())
    }

    fn devices(&self) -> Result<Vec<RawDeviceDescriptor>, DiscoveryError> {
        Ok(self.devices.clone())
    }

    fn prefers_kernel_streaming(&self) -> bool {
        self.kernel_streaming
    }
}
