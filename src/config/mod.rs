//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

use crate::audio::CaptureConfig;
use crate::device::{HostApiPreference, SensorSensitivity};

pub use defaults::{
    DEFAULT_BLOCK_SIZE, DEFAULT_CAPTURE_SECONDS, DEFAULT_QUEUE_CAPACITY, DEFAULT_SAMPLE_RATE,
    SUPPORTED_SAMPLE_RATES,
};

/// CLI options for digidaq. Values are validated before any device is opened.
#[derive(Debug, Parser, Clone)]
#[command(
    about = "DigiDAQ: find USB audio vibration sensors and capture scaled data",
    author,
    version
)]
pub struct AppConfig {
    /// Print the decoded compatible devices and exit
    #[arg(long = "list-devices", default_value_t = false)]
    pub list_devices: bool,

    /// Emit device lists and capture summaries as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Entry of the decoded device list to capture from
    #[arg(long, default_value_t = 0)]
    pub select: usize,

    /// Host API to search instead of the platform default
    #[arg(long = "host-api", env = "DIGIDAQ_HOST_API")]
    pub host_api: Option<String>,

    /// Capture duration in seconds
    #[arg(long, default_value_t = DEFAULT_CAPTURE_SECONDS)]
    pub seconds: f64,

    /// Sample rate (Hz)
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Frames per block handed from the audio callback to the consumer
    #[arg(long = "block-size", default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Blocks buffered between the audio callback and the consumer
    #[arg(long = "queue-capacity", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Attached sensor sensitivity in mV per unit, per channel (0 = volts)
    #[arg(long = "eu-sensitivity", action = ArgAction::Append, value_name = "MV")]
    pub eu_sensitivity: Vec<f64>,

    /// Unit label of the attached sensor, per channel
    #[arg(long = "eu-units", action = ArgAction::Append, value_name = "UNIT")]
    pub eu_units: Vec<String>,

    /// Write scaled samples to this CSV file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Append JSON trace logs to a file
    #[arg(long = "logs", env = "DIGIDAQ_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all logging (overrides --logs and --verbose)
    #[arg(long = "no-logs", env = "DIGIDAQ_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Log enumeration and decode details to stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl AppConfig {
    pub fn host_api_preference(&self) -> HostApiPreference {
        match &self.host_api {
            Some(name) => HostApiPreference::Named(name.clone()),
            None => HostApiPreference::Platform,
        }
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate: self.sample_rate,
            block_size: self.block_size,
            duration: Duration::from_secs_f64(self.seconds),
            queue_capacity: self.queue_capacity,
        }
    }

    /// Per-channel sensor sensitivities; channels without one stay unscaled.
    pub fn sensor_sensitivities(&self) -> [Option<SensorSensitivity>; 2] {
        [0, 1].map(|ch| {
            self.eu_sensitivity.get(ch).map(|&mv| {
                let units = self
                    .eu_units
                    .get(ch)
                    .cloned()
                    .unwrap_or_else(|| "EU".to_string());
                SensorSensitivity::new(mv, units)
            })
        })
    }
}
