//! Espectro Core - PCM sample codecs
//!
//! This crate converts raw PCM bytes to normalized `f64` samples and back,
//! bit-exactly, for every common integer and float layout.
//!
//! # Core Abstractions
//!
//! - [`AudioFormat`] - Immutable description of a PCM byte stream
//! - [`SampleCodec`] - Codec selected from an [`AudioFormat`]
//! - [`PcmConvert`] - Conversion trait implemented by every strategy
//! - [`LsbMask`] - Adapter that clears unused low bits for sub-byte depths
//! - [`PaddingPolicy`] - Placement of padding bytes for depths above 32 bits
//!
//! # Supported Layouts
//!
//! | Encoding | Depths | Byte orders |
//! |----------|--------|-------------|
//! | Signed / unsigned integer | 1..=64 | little, big |
//! | IEEE float | 32, 64 | little, big |
//!
//! Integer samples decode to `[-1.0, 1.0]`; the most positive code maps to
//! exactly `+1.0` and the most negative to exactly `-1.0`.
//!
//! # Feature Flags
//!
//! - `tracing` - Emit a debug event when a codec is selected
//!
//! # Example
//!
//! ```rust
//! use espectro_core::{AudioFormat, ByteOrder, SampleCodec};
//!
//! let format = AudioFormat::unsigned(8000.0, 2, 8, ByteOrder::Little);
//! let mut codec = SampleCodec::new(&format).unwrap();
//!
//! let samples = codec.decode_to_vec(&[128, 255, 0, 128]).unwrap();
//! assert_eq!(samples, [0.0, 1.0, -1.0, 0.0]);
//! ```

pub mod codec;
mod error;
pub mod format;

pub use codec::{LsbMask, PaddingPolicy, PcmConvert, SampleCodec};
pub use error::{CodecError, Result};
pub use format::{AudioFormat, ByteOrder, Encoding};
