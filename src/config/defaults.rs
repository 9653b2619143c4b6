pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;
pub const DEFAULT_BLOCK_SIZE: usize = 1024;
pub const DEFAULT_CAPTURE_SECONDS: f64 = 2.0;
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Rates the devices accept over USB audio class.
pub const SUPPORTED_SAMPLE_RATES: &[u32] = &[8_000, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000];

pub(super) const MIN_BLOCK_SIZE: usize = 16;
pub(super) const MAX_BLOCK_SIZE: usize = 65_536;
pub(super) const MAX_CAPTURE_SECONDS: f64 = 3_600.0;
pub(super) const MAX_QUEUE_CAPACITY: usize = 4_096;
pub(super) const MAX_UNIT_LABEL_CHARS: usize = 16;
