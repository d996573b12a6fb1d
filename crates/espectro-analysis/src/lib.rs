//! Espectro Analysis - Streaming spectrograms over raw PCM
//!
//! This crate turns a PCM byte stream into a per-channel frequency-time
//! matrix on a perceptual or logarithmic frequency axis:
//!
//! - [`window`] - Tapering window functions
//! - [`fft`] - Radix-2 FFT with fused windowing
//! - [`scale`] - Mel, bark, ERB, log and linear frequency scales
//! - [`filterbank`] - Scale-spaced interpolating filter bank
//! - [`level`] - RMS, peak and decibel mapping helpers
//! - [`analyzer`] - Pull-based streaming analyzer
//! - [`spectrogram`] - Frequency-time result matrix
//! - [`range`] - Normal-range alarm scan
//! - [`source`] - Byte-source helpers and cancellation
//!
//! ## Feature Flags
//!
//! - `parallel` - Transform channels of one step on the rayon thread pool
//!
//! ## Example
//!
//! ```rust
//! use std::io::Cursor;
//! use espectro_analysis::{AnalyzerSettings, ScaleType, StreamingAnalyzer};
//! use espectro_core::{AudioFormat, ByteOrder};
//!
//! // One second of 16-bit silence
//! let format = AudioFormat::signed(44100.0, 1, 16, ByteOrder::Little);
//! let pcm = vec![0u8; 44100 * 2];
//!
//! let settings = AnalyzerSettings {
//!     frame_size: 1024,
//!     scale: ScaleType::Mel,
//!     num_filters: Some(128),
//!     ..Default::default()
//! };
//! let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();
//! analyzer.run(&mut Cursor::new(pcm)).unwrap();
//!
//! let spectrogram = analyzer.into_spectrogram();
//! assert_eq!(spectrogram.num_frames(), 43);
//! assert_eq!(spectrogram.num_filters(), 128);
//! ```

pub mod analyzer;
mod error;
pub mod fft;
pub mod filterbank;
pub mod level;
pub mod range;
pub mod scale;
pub mod source;
pub mod spectrogram;
pub mod window;

pub use analyzer::{
    AnalyzerSettings, RunOutcome, StepOutcome, StreamingAnalyzer, TailPolicy,
    overlap_for_target_frames,
};
pub use error::{AnalysisError, Result};
pub use fft::SpectralTransform;
pub use filterbank::ScaleFilterBank;
pub use range::{AlarmReport, NormalRange};
pub use scale::{ScaleType, format_hz};
pub use source::{CancellationToken, read_full};
pub use spectrogram::Spectrogram;
pub use window::WindowFunction;
