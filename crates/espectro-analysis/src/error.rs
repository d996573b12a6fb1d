//! Error types for spectral analysis.

use std::io;

use espectro_core::CodecError;
use thiserror::Error;

/// Errors raised while configuring or running an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The PCM format could not be handled.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A size, overlap, scale or other setting is out of range.
    #[error("invalid analysis configuration: {0}")]
    InvalidConfiguration(String),

    /// Window name not recognised.
    #[error("unsupported window function: '{0}'")]
    UnsupportedWindow(String),

    /// A frame passed to the transform has the wrong length.
    #[error("frame length {actual} does not match transform size {expected}")]
    FrameLength {
        /// Transform size.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// The byte source failed; results gathered so far remain readable.
    #[error("failed to read from PCM source: {0}")]
    SourceRead(#[source] io::Error),
}

impl AnalysisError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidConfiguration(reason.into())
    }
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
