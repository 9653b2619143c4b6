pub mod audio;
pub mod config;
pub mod device;
pub mod export;
mod telemetry;

pub use device::{
    discover, discover_devices, DataFormat, DecodeError, DecodedDevice, DiscoveryError,
    HostApiPreference,
};
pub use telemetry::{init_tracing, tracing_log_path};
