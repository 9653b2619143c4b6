use thiserror::Error;

/// Why a single raw device name could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The format character is present but is not one of `1`, `2`, `3`.
    #[error("unrecognized format code {code:?} (expected 1, 2, or 3)")]
    UnrecognizedFormat { code: char },

    /// A field is missing, truncated, or does not hold the expected value.
    #[error("malformed {field} field: {reason}")]
    MalformedField { field: &'static str, reason: String },
}

impl DecodeError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field,
            reason: reason.into(),
        }
    }
}

/// A decode failure tied to the raw descriptor that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub device_index: usize,
    pub name: String,
    pub error: DecodeError,
}

/// Errors that end a discovery call.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Nothing matched the host API filter and a known model prefix.
    #[error("no compatible devices found")]
    NoDevicesFound { failures: Vec<DecodeFailure> },

    /// The audio subsystem could not list host APIs or devices.
    #[error("audio device enumeration failed: {0}")]
    Enumeration(String),
}
