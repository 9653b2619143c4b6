use digidaq::audio::CaptureSummary;
use digidaq::device::{ChannelScale, DecodeFailure, DecodedDevice};
use serde::Serialize;

/// Human-readable table of decoded devices, one row per entry.
pub(crate) fn format_device_table(devices: &[DecodedDevice]) -> String {
    let mut out = String::from("Compatible devices:\n");
    out.push_str(&format!(
        "  {:>3}  {:>6}  {:<6}  {:<6}  {:<12}  {:>17}  {:>21}  {}\n",
        "#", "device", "model", "serial", "format", "sensitivity", "scale", "calibrated"
    ));
    for (entry, device) in devices.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}  {:>6}  {:<6}  {:<6}  {:<12}  {:>8} {:>8}  {:>10.5} {:>10.5}  {}\n",
            entry,
            device.device_index,
            device.model,
            device.serial_number,
            device.format.label(),
            device.sensitivity_raw[0],
            device.sensitivity_raw[1],
            device.scale[0],
            device.scale[1],
            device.calibration_date.format("%Y-%m-%d"),
        ));
    }
    out
}

pub(crate) fn format_failures(failures: &[DecodeFailure]) -> String {
    let mut out = String::new();
    for failure in failures {
        out.push_str(&format!(
            "  skipped device {} ({}): {}\n",
            failure.device_index, failure.name, failure.error
        ));
    }
    out
}

#[derive(Debug, Serialize)]
pub(crate) struct ChannelReport {
    pub units: String,
    pub scale: f32,
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    pub rms: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CaptureReport<'a> {
    pub device: &'a DecodedDevice,
    pub sample_rate: u32,
    pub blocks: usize,
    pub frames: usize,
    pub dropped_blocks: usize,
    pub stalled: bool,
    pub channels: Vec<ChannelReport>,
}

impl<'a> CaptureReport<'a> {
    pub(crate) fn new(
        device: &'a DecodedDevice,
        sample_rate: u32,
        scales: &[ChannelScale; 2],
        summary: &CaptureSummary,
    ) -> Self {
        let channels = scales
            .iter()
            .zip(summary.channels.iter())
            .map(|(scale, stats)| ChannelReport {
                units: scale.units.clone(),
                scale: scale.factor,
                min: if stats.count == 0 { 0.0 } else { stats.min },
                max: if stats.count == 0 { 0.0 } else { stats.max },
                mean: stats.mean(),
                rms: stats.rms(),
            })
            .collect();
        Self {
            device,
            sample_rate,
            blocks: summary.blocks,
            frames: summary.frames,
            dropped_blocks: summary.dropped_blocks,
            stalled: summary.stalled,
            channels,
        }
    }

    pub(crate) fn to_text(&self) -> String {
        let mut out = format!(
            "{} S/N {}: {} frames at {} Hz in {} blocks",
            self.device.model, self.device.serial_number, self.frames, self.sample_rate, self.blocks
        );
        if self.dropped_blocks > 0 {
            out.push_str(&format!(", {} dropped", self.dropped_blocks));
        }
        if self.stalled {
            out.push_str(", stream stalled");
        }
        out.push('\n');
        for (ch, channel) in self.channels.iter().enumerate() {
            out.push_str(&format!(
                "  ch{}: min {:.6} max {:.6} mean {:.6} rms {:.6} {}\n",
                ch + 1,
                channel.min,
                channel.max,
                channel.mean,
                channel.rms,
                channel.units
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use digidaq::audio::{accumulate, ChannelStats};
    use digidaq::device::{DataFormat, DecodeError};

    fn sample_device() -> DecodedDevice {
        DecodedDevice {
            device_index: 4,
            name: "485B39 212345602560000256000220615".to_string(),
            model: "485B39".to_string(),
            serial_number: "123456".to_string(),
            calibration_date: NaiveDate::from_ymd_opt(2022, 6, 15).unwrap(),
            format: DataFormat::Voltage,
            format_code: '2',
            sensitivity_raw: [256_000, 256_000],
            scale: [32.768, 32.768],
        }
    }

    #[test]
    fn device_table_lists_each_entry() {
        let table = format_device_table(&[sample_device()]);
        assert!(table.starts_with("Compatible devices:"));
        assert!(table.contains("485B39"));
        assert!(table.contains("123456"));
        assert!(table.contains("voltage"));
        assert!(table.contains("2022-06-15"));
        assert!(table.contains("32.76800"));
    }

    #[test]
    fn failures_name_the_device() {
        let text = format_failures(&[DecodeFailure {
            device_index: 7,
            name: "485B39 9".to_string(),
            error: DecodeError::UnrecognizedFormat { code: '9' },
        }]);
        assert!(text.contains("skipped device 7"));
        assert!(text.contains("unrecognized format code '9'"));
    }

    #[test]
    fn capture_report_uses_channel_units() {
        let device = sample_device();
        let mut channels = [ChannelStats::default(); 2];
        accumulate(&mut channels, &[1.0, -2.0, 3.0, 2.0]);
        let summary = CaptureSummary {
            blocks: 1,
            frames: 2,
            dropped_blocks: 1,
            stalled: false,
            channels,
        };
        let scales = [
            ChannelScale {
                factor: 327.68,
                units: "g".to_string(),
            },
            ChannelScale {
                factor: 32.768,
                units: "V".to_string(),
            },
        ];
        let report = CaptureReport::new(&device, 48_000, &scales, &summary);
        assert_eq!(report.channels[0].max, 3.0);
        assert_eq!(report.channels[1].min, -2.0);
        let text = report.to_text();
        assert!(text.contains("485B39 S/N 123456: 2 frames at 48000 Hz in 1 blocks, 1 dropped"));
        assert!(text.contains("ch1: min 1.000000 max 3.000000"));
        assert!(text.ends_with(" V\n"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["channels"][0]["units"], "g");
        assert_eq!(json["device"]["model"], "485B39");
    }
}
