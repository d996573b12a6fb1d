//! Error types for codec construction and conversion.

use thiserror::Error;

use crate::format::Encoding;

/// Errors raised while building or driving a [`SampleCodec`](crate::SampleCodec).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// The format descriptor is internally inconsistent.
    #[error("invalid audio format: {reason}")]
    InvalidFormat {
        /// Description of the inconsistency.
        reason: String,
    },

    /// The encoding/depth combination has no codec.
    #[error("unsupported audio format: {encoding} at {bits} bits")]
    UnsupportedFormat {
        /// Requested sample encoding.
        encoding: Encoding,
        /// Requested bit depth.
        bits: u32,
    },

    /// A caller-supplied buffer cannot hold the requested samples.
    #[error("buffer too short: need {needed} elements, have {available}")]
    BufferTooShort {
        /// Number of elements the call needs.
        needed: usize,
        /// Number of elements the buffer holds.
        available: usize,
    },
}

impl CodecError {
    /// Create an invalid format error.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        CodecError::InvalidFormat {
            reason: reason.into(),
        }
    }
}

/// Convenience result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_display() {
        let err = CodecError::invalid_format("frame size 3 does not match 2 channels of 16 bits");
        assert_eq!(
            err.to_string(),
            "invalid audio format: frame size 3 does not match 2 channels of 16 bits"
        );
    }

    #[test]
    fn unsupported_format_display() {
        let err = CodecError::UnsupportedFormat {
            encoding: Encoding::Float,
            bits: 16,
        };
        assert_eq!(err.to_string(), "unsupported audio format: float at 16 bits");
    }

    #[test]
    fn buffer_too_short_display() {
        let err = CodecError::BufferTooShort {
            needed: 8,
            available: 4,
        };
        assert_eq!(err.to_string(), "buffer too short: need 8 elements, have 4");
    }
}
