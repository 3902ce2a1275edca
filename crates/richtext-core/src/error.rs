//! Errors shared by the span engine operations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by span engine operations.
pub enum FormatError {
    #[error("offset range {start}..{end} is out of range for a buffer of {len} characters")]
    /// An offset lies outside `[0, len]`, or `start > end`.
    OutOfRange {
        /// Requested start offset.
        start: usize,
        /// Requested end offset.
        end: usize,
        /// Buffer length in characters at the time of the call.
        len: usize,
    },

    #[error("invalid format request: {0}")]
    /// The request cannot produce a valid span (e.g. a link without a URL).
    InvalidFormatRequest(&'static str),

    #[error("unknown format kind '{0}'")]
    /// A kind identifier outside the closed vocabulary.
    UnknownKind(String),
}

impl FormatError {
    pub(crate) fn out_of_range(start: usize, end: usize, len: usize) -> Self {
        Self::OutOfRange { start, end, len }
    }
}

/// Validate a half-open range against a buffer of `len` characters.
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), FormatError> {
    if start > end || end > len {
        return Err(FormatError::out_of_range(start, end, len));
    }
    Ok(())
}
