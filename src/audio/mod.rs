//! Audio subsystem access and stereo capture.
//!
//! [`CpalSubsystem`] feeds device discovery; [`Recorder`] reopens a decoded
//! device by its enumeration index and captures scaled blocks from it.

mod capture;
mod dispatch;
mod stats;
mod subsystem;

pub use capture::{CaptureConfig, CaptureSummary, Recorder, CHANNELS};
pub use stats::{accumulate, apply_scale, ChannelStats};
pub use subsystem::CpalSubsystem;
