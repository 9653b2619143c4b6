//! DigiDAQ command-line entry point.
//!
//! Discovers compatible devices, then either lists them or captures a short
//! stereo recording from one and reports it in engineering units.

mod report;

use anyhow::{anyhow, bail, Context, Result};
use digidaq::audio::{CpalSubsystem, Recorder};
use digidaq::config::AppConfig;
use digidaq::device::{
    channel_scales, scan_subsystem, AudioSubsystem, DecodedDevice, StaticSubsystem,
};
use digidaq::export::CsvSink;
use digidaq::init_tracing;
use tracing::{debug, info};

use crate::report::{format_device_table, format_failures, CaptureReport};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_tracing(&config);
    debug!(version = env!("CARGO_PKG_VERSION"), "digidaq started");

    let fixture = match StaticSubsystem::from_env() {
        Some(parsed) => Some(parsed.context("invalid test device fixture")?),
        None => None,
    };
    let subsystem: &dyn AudioSubsystem = match &fixture {
        Some(fixture) => fixture,
        None => &CpalSubsystem,
    };

    let report = scan_subsystem(subsystem, &config.host_api_preference())?;
    eprint!("{}", format_failures(&report.failures));
    let devices = report.devices;
    if devices.is_empty() {
        if config.list_devices {
            if config.json {
                println!("[]");
            } else {
                println!("No compatible devices found.");
            }
            return Ok(());
        }
        bail!("no compatible devices found; check that the device is connected");
    }

    if config.list_devices {
        print_devices(&config, &devices)?;
        return Ok(());
    }

    if fixture.is_some() {
        bail!("capture needs real hardware; unset the test device fixture to record");
    }
    capture(&config, &devices)
}

fn print_devices(config: &AppConfig, devices: &[DecodedDevice]) -> Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(devices)?);
    } else {
        print!("{}", format_device_table(devices));
    }
    Ok(())
}

fn capture(config: &AppConfig, devices: &[DecodedDevice]) -> Result<()> {
    let device = devices.get(config.select).ok_or_else(|| {
        anyhow!(
            "--select {} is out of range; {} compatible device(s) found",
            config.select,
            devices.len()
        )
    })?;
    if devices.len() > 1 && config.select == 0 {
        info!(count = devices.len(), "using first device found");
    }

    let scales = channel_scales(device, &config.sensor_sensitivities());
    let factors = [scales[0].factor, scales[1].factor];
    let capture_config = config.capture_config();
    let recorder = Recorder::open(device.device_index)?;
    info!(
        device_index = recorder.device_index(),
        name = %recorder.device_name(),
        model = %device.model,
        serial = %device.serial_number,
        "capturing"
    );

    let mut sink = match &config.output {
        Some(path) => Some(CsvSink::create(
            path,
            capture_config.sample_rate,
            [scales[0].units.as_str(), scales[1].units.as_str()],
        )?),
        None => None,
    };
    let summary = recorder.capture(&capture_config, factors, |block| {
        if let Some(sink) = sink.as_mut() {
            sink.write_block(block).context("failed to write CSV output")?;
        }
        Ok(())
    })?;
    if let Some(sink) = sink {
        sink.finish().context("failed to flush CSV output")?;
    }

    let report = CaptureReport::new(device, capture_config.sample_rate, &scales, &summary);
    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}
