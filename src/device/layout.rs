//! Fixed-offset field layout of the identification record embedded in a
//! device name.
//!
//! Offsets count characters from the first character of the matched model
//! prefix. Every layout is checked against the remaining length of the name
//! before anything is sliced.

use super::error::DecodeError;

/// A `[start, start + len)` character range relative to the model prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub start: usize,
    pub len: usize,
}

impl FieldSpan {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub const fn end(self) -> usize {
        self.start + self.len
    }
}

pub const MODEL: FieldSpan = FieldSpan::new(0, 6);
pub const FORMAT_CODE: FieldSpan = FieldSpan::new(7, 1);
pub const SERIAL_NUMBER: FieldSpan = FieldSpan::new(8, 6);

/// Format-dependent part of the record: two sensitivities and a YYMMDD date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub sensitivity: [FieldSpan; 2],
    pub calibration_date: FieldSpan,
}

impl FieldLayout {
    /// Characters needed after the prefix to hold every field of this layout.
    pub fn required_len(&self) -> usize {
        [
            MODEL.end(),
            FORMAT_CODE.end(),
            SERIAL_NUMBER.end(),
            self.sensitivity[0].end(),
            self.sensitivity[1].end(),
            self.calibration_date.end(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Voltage devices (format codes `2` and `3`): 7-digit sensitivities.
pub const VOLTAGE_LAYOUT: FieldLayout = FieldLayout {
    sensitivity: [FieldSpan::new(14, 7), FieldSpan::new(21, 7)],
    calibration_date: FieldSpan::new(28, 6),
};

/// Acceleration devices (format code `1`): 5-digit sensitivities.
pub const ACCELERATION_LAYOUT: FieldLayout = FieldLayout {
    sensitivity: [FieldSpan::new(14, 5), FieldSpan::new(19, 5)],
    calibration_date: FieldSpan::new(24, 6),
};

/// Character-indexed view of a name, starting at the model prefix.
pub(crate) struct Record<'a> {
    tail: &'a str,
    char_len: usize,
}

impl<'a> Record<'a> {
    pub(crate) fn new(tail: &'a str) -> Self {
        Self {
            tail,
            char_len: tail.chars().count(),
        }
    }

    pub(crate) fn char_len(&self) -> usize {
        self.char_len
    }

    pub(crate) fn ensure_len(&self, field: &'static str, needed: usize) -> Result<(), DecodeError> {
        if self.char_len < needed {
            return Err(DecodeError::malformed(
                field,
                format!(
                    "record truncated: need {needed} characters after the model prefix, found {}",
                    self.char_len
                ),
            ));
        }
        Ok(())
    }

    /// Slice one field, or report which field ran off the end.
    pub(crate) fn field(&self, field: &'static str, span: FieldSpan) -> Result<&'a str, DecodeError> {
        self.ensure_len(field, span.end())?;
        let byte_at = |char_idx: usize| {
            self.tail
                .char_indices()
                .nth(char_idx)
                .map(|(idx, _)| idx)
                .unwrap_or(self.tail.len())
        };
        Ok(&self.tail[byte_at(span.start)..byte_at(span.end())])
    }
}
