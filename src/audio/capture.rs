//! Stereo capture from a decoded device via CPAL.
//!
//! Samples arrive on CPAL's callback thread, are re-chunked into fixed-size
//! blocks, and cross to the caller over a bounded channel. The caller's
//! thread scales each block to engineering units and folds it into the
//! summary.

use super::dispatch::BlockDispatcher;
use super::stats::{accumulate, apply_scale, ChannelStats};
use super::subsystem::CpalSubsystem;
use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use crossbeam_channel::{bounded, RecvTimeoutError};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Every supported device is a two-channel endpoint.
pub const CHANNELS: u16 = 2;

/// Extra time allowed for the stream to deliver its last block.
const STREAM_STALL_GRACE: Duration = Duration::from_secs(2);

/// Stream parameters chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    pub block_size: usize,
    pub duration: Duration,
    pub queue_capacity: usize,
}

impl CaptureConfig {
    pub fn target_frames(&self) -> usize {
        (self.duration.as_secs_f64() * f64::from(self.sample_rate)).ceil() as usize
    }
}

/// What one capture produced, in engineering units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureSummary {
    pub blocks: usize,
    pub frames: usize,
    pub dropped_blocks: usize,
    pub stalled: bool,
    pub channels: [ChannelStats; 2],
}

/// An input device reopened by its enumeration index.
pub struct Recorder {
    device: cpal::Device,
    device_index: usize,
}

impl Recorder {
    /// Reopen the input device at `device_index` of a fresh enumeration.
    pub fn open(device_index: usize) -> Result<Self> {
        let devices = CpalSubsystem::new()
            .input_devices()
            .context("failed to enumerate input devices")?;
        let total = devices.len();
        let (_, device) = devices
            .into_iter()
            .nth(device_index)
            .ok_or_else(|| anyhow!("input device {device_index} not found ({total} present)"))?;
        Ok(Self {
            device,
            device_index,
        })
    }

    pub fn device_index(&self) -> usize {
        self.device_index
    }

    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Capture for `cfg.duration`, scaling each block by `scale`.
    ///
    /// `on_block` sees every scaled interleaved block in arrival order.
    pub fn capture<F>(
        &self,
        cfg: &CaptureConfig,
        scale: [f32; 2],
        mut on_block: F,
    ) -> Result<CaptureSummary>
    where
        F: FnMut(&[f32]) -> Result<()>,
    {
        let format = self.pick_sample_format(cfg.sample_rate)?;
        let stream_config = StreamConfig {
            channels: CHANNELS,
            sample_rate: SampleRate(cfg.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };
        debug!(
            device_index = self.device_index,
            ?format,
            sample_rate = cfg.sample_rate,
            block_size = cfg.block_size,
            "opening input stream"
        );

        let (sender, receiver) = bounded::<Vec<f32>>(cfg.queue_capacity.max(1));
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut dispatcher =
            BlockDispatcher::new(cfg.block_size, usize::from(CHANNELS), sender, dropped.clone());
        let err_fn = |err: cpal::StreamError| warn!(%err, "audio stream error");

        let stream = match format {
            SampleFormat::F32 => self.device.build_input_stream(
                &stream_config,
                move |data: &[f32], _| dispatcher.push(data, |sample| sample),
                err_fn,
                None,
            )?,
            SampleFormat::I32 => self.device.build_input_stream(
                &stream_config,
                move |data: &[i32], _| {
                    dispatcher.push(data, |sample| sample as f32 / 2_147_483_648.0_f32)
                },
                err_fn,
                None,
            )?,
            SampleFormat::I16 => self.device.build_input_stream(
                &stream_config,
                move |data: &[i16], _| {
                    dispatcher.push(data, |sample| sample as f32 / 32_768.0_f32)
                },
                err_fn,
                None,
            )?,
            SampleFormat::U16 => self.device.build_input_stream(
                &stream_config,
                move |data: &[u16], _| {
                    dispatcher.push(data, |sample| (sample as f32 - 32_768.0_f32) / 32_768.0_f32)
                },
                err_fn,
                None,
            )?,
            other => bail!("unsupported sample format: {other:?}"),
        };

        stream.play()?;

        let target_frames = cfg.target_frames();
        let deadline = Instant::now() + cfg.duration + STREAM_STALL_GRACE;
        let mut summary = CaptureSummary {
            blocks: 0,
            frames: 0,
            dropped_blocks: 0,
            stalled: false,
            channels: [ChannelStats::default(); 2],
        };

        while summary.frames < target_frames {
            let wait = deadline.saturating_duration_since(Instant::now());
            match receiver.recv_timeout(wait) {
                Ok(mut block) => {
                    trim_to_target(&mut block, summary.frames, target_frames);
                    apply_scale(&mut block, &scale);
                    accumulate(&mut summary.channels, &block);
                    summary.blocks += 1;
                    summary.frames += block.len() / usize::from(CHANNELS);
                    on_block(&block)?;
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        frames = summary.frames,
                        target_frames, "input stream stalled before capture completed"
                    );
                    summary.stalled = true;
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    bail!("audio stream disconnected");
                }
            }
        }

        if let Err(err) = stream.pause() {
            debug!(%err, "failed to pause audio stream");
        }
        drop(stream);

        summary.dropped_blocks = dropped.load(Ordering::Relaxed);
        if summary.blocks == 0 {
            bail!(
                "no samples captured from '{}'; check that the device is connected and not in use",
                self.device_name()
            );
        }
        info!(
            blocks = summary.blocks,
            frames = summary.frames,
            dropped = summary.dropped_blocks,
            "capture finished"
        );
        Ok(summary)
    }

    /// Best sample format the device offers for stereo at `sample_rate`.
    fn pick_sample_format(&self, sample_rate: u32) -> Result<SampleFormat> {
        let ranges = self
            .device
            .supported_input_configs()
            .context("failed to query supported input configurations")?;
        let offered: Vec<SampleFormat> = ranges
            .filter(|range| {
                range.channels() == CHANNELS
                    && range.min_sample_rate().0 <= sample_rate
                    && sample_rate <= range.max_sample_rate().0
            })
            .map(|range| range.sample_format())
            .collect();
        preferred_sample_format(&offered).ok_or_else(|| {
            anyhow!(
                "'{}' does not support {CHANNELS}-channel capture at {sample_rate} Hz",
                self.device_name()
            )
        })
    }
}

/// Drop the frames of `block` that run past `target_frames`.
fn trim_to_target(block: &mut Vec<f32>, frames: usize, target_frames: usize) {
    let remaining = target_frames.saturating_sub(frames) * usize::from(CHANNELS);
    block.truncate(remaining);
}

/// Prefer float, then the widest integer format.
pub(crate) fn preferred_sample_format(offered: &[SampleFormat]) -> Option<SampleFormat> {
    [
        SampleFormat::F32,
        SampleFormat::I32,
        SampleFormat::I16,
        SampleFormat::U16,
    ]
    .into_iter()
    .find(|format| offered.contains(format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_float_samples() {
        let offered = [SampleFormat::I16, SampleFormat::F32, SampleFormat::I32];
        assert_eq!(preferred_sample_format(&offered), Some(SampleFormat::F32));
    }

    #[test]
    fn falls_back_to_widest_integer() {
        let offered = [SampleFormat::U16, SampleFormat::I16, SampleFormat::I32];
        assert_eq!(preferred_sample_format(&offered), Some(SampleFormat::I32));
    }

    #[test]
    fn rejects_unsupported_formats() {
        assert_eq!(preferred_sample_format(&[SampleFormat::U8]), None);
        assert_eq!(preferred_sample_format(&[]), None);
    }

    #[test]
    fn last_block_is_trimmed_to_duration() {
        let mut block: Vec<f32> = (0..8).map(|n| n as f32).collect();
        trim_to_target(&mut block, 10, 13);
        assert_eq!(block, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        let mut block = vec![0.5f32; 8];
        trim_to_target(&mut block, 0, 100);
        assert_eq!(block.len(), 8);
    }

    #[test]
    fn target_frames_rounds_up() {
        let cfg = CaptureConfig {
            sample_rate: 44_100,
            block_size: 1024,
            duration: Duration::from_millis(1_500),
            queue_capacity: 16,
        };
        assert_eq!(cfg.target_frames(), 66_150);
    }
}
