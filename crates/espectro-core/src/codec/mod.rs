//! PCM ↔ f64 sample conversion.
//!
//! [`SampleCodec`] is built once per [`AudioFormat`] and converts between
//! raw PCM bytes and normalized `f64` samples in both directions.
//!
//! Strategy selection is a pure function of encoding, bit depth and byte
//! order:
//!
//! | Encoding | Depth | Strategy |
//! |----------|-------|----------|
//! | signed / unsigned | 1..=8 | 8-bit |
//! | signed / unsigned | 9..=16 | 16-bit |
//! | signed / unsigned | 17..=24 | 24-bit |
//! | signed / unsigned | 25..=32 | 32-bit |
//! | signed / unsigned | 33..=64 | 32-bit value plus padding bytes |
//! | float | 32, 64 | IEEE 754 |
//!
//! Integer depths that are not a multiple of 8 are wrapped in an
//! [`LsbMask`] adapter that clears the unused low-order bits of each sample.
//!
//! # Quantization
//!
//! Integer codecs map a code `v` to `v / (2^(b-1) - 1)` when positive and
//! `v / 2^(b-1)` otherwise, where `b` is the container width. Zero and the
//! most negative code therefore round-trip exactly and the most positive
//! code decodes to exactly `+1.0`. Unsigned encodings subtract the bias
//! `2^(b-1)` first.
//!
//! # Example
//!
//! ```rust
//! use espectro_core::{AudioFormat, ByteOrder, SampleCodec};
//!
//! let format = AudioFormat::signed(44100.0, 1, 16, ByteOrder::Little);
//! let mut codec = SampleCodec::new(&format).unwrap();
//!
//! let bytes = codec.encode_to_vec(&[0.0, 1.0, -1.0]).unwrap();
//! assert_eq!(bytes, [0x00, 0x00, 0xFF, 0x7F, 0x00, 0x80]);
//!
//! let samples = codec.decode_to_vec(&bytes).unwrap();
//! assert_eq!(samples, [0.0, 1.0, -1.0]);
//! ```

mod float;
mod integer;
mod mask;

use crate::error::{CodecError, Result};
use crate::format::{AudioFormat, Encoding, bytes_for_bits};

pub use mask::LsbMask;

use float::FloatCodec;
use integer::{IntegerCodec, Layout};

/// Which end of a wide (> 32 bit) integer container holds the padding bytes.
///
/// Only the 32 most significant bits of such samples carry signal; the
/// remaining bytes are skipped on decode and zero-filled on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingPolicy {
    /// Padding occupies the low-order bytes (first in little endian, last in big endian).
    #[default]
    LeastSignificant,
    /// Padding occupies the high-order bytes (last in little endian, first in big endian).
    MostSignificant,
}

/// Bidirectional conversion between PCM bytes and normalized samples.
///
/// Implementations may keep reusable scratch buffers, so conversion takes
/// `&mut self`; one instance must not be shared by concurrent callers.
pub trait PcmConvert {
    /// Bytes occupied by one sample.
    fn bytes_per_sample(&self) -> usize;

    /// Decode `count` samples starting at `byte_offset` into `out[out_offset..]`.
    fn decode(
        &mut self,
        bytes: &[u8],
        byte_offset: usize,
        out: &mut [f64],
        out_offset: usize,
        count: usize,
    ) -> Result<()>;

    /// Encode `samples[sample_offset..sample_offset + count]` into `out[byte_offset..]`.
    fn encode(
        &mut self,
        samples: &[f64],
        sample_offset: usize,
        count: usize,
        out: &mut [u8],
        byte_offset: usize,
    ) -> Result<()>;
}

impl<C: PcmConvert + ?Sized> PcmConvert for &mut C {
    fn bytes_per_sample(&self) -> usize {
        (**self).bytes_per_sample()
    }

    fn decode(
        &mut self,
        bytes: &[u8],
        byte_offset: usize,
        out: &mut [f64],
        out_offset: usize,
        count: usize,
    ) -> Result<()> {
        (**self).decode(bytes, byte_offset, out, out_offset, count)
    }

    fn encode(
        &mut self,
        samples: &[f64],
        sample_offset: usize,
        count: usize,
        out: &mut [u8],
        byte_offset: usize,
    ) -> Result<()> {
        (**self).encode(samples, sample_offset, count, out, byte_offset)
    }
}

/// Selected conversion strategy.
#[derive(Debug, Clone)]
enum Strategy {
    Integer(IntegerCodec),
    Float(FloatCodec),
    Masked(LsbMask<IntegerCodec>),
}

/// Codec for one [`AudioFormat`].
#[derive(Debug, Clone)]
pub struct SampleCodec {
    format: AudioFormat,
    strategy: Strategy,
}

impl SampleCodec {
    /// Build the codec for `format` using the default [`PaddingPolicy`].
    pub fn new(format: &AudioFormat) -> Result<Self> {
        Self::with_padding(format, PaddingPolicy::default())
    }

    /// Build the codec for `format` with an explicit padding policy for
    /// integer depths above 32 bits.
    pub fn with_padding(format: &AudioFormat, padding: PaddingPolicy) -> Result<Self> {
        format.validate()?;
        let bits = format.bits_per_sample();
        let order = format.byte_order();

        let strategy = match format.encoding() {
            Encoding::Float => match bits {
                32 => Strategy::Float(FloatCodec::single(order)),
                64 => Strategy::Float(FloatCodec::double(order)),
                _ => {
                    return Err(CodecError::UnsupportedFormat {
                        encoding: Encoding::Float,
                        bits,
                    });
                }
            },
            encoding @ (Encoding::SignedInt | Encoding::UnsignedInt) => {
                let layout = match bits {
                    1..=8 => Layout::Int8,
                    9..=16 => Layout::Int16,
                    17..=24 => Layout::Int24,
                    25..=32 => Layout::Int32,
                    33..=64 => Layout::Int32Padded {
                        padding: bytes_for_bits(bits) - 4,
                        policy: padding,
                    },
                    _ => return Err(CodecError::UnsupportedFormat { encoding, bits }),
                };
                let codec = IntegerCodec::new(layout, encoding == Encoding::SignedInt, order);
                if bits % 8 == 0 {
                    Strategy::Integer(codec)
                } else {
                    Strategy::Masked(LsbMask::new(codec, bits, order))
                }
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            encoding = %format.encoding(),
            bits,
            channels = format.channels(),
            masked = matches!(strategy, Strategy::Masked(_)),
            "sample codec selected"
        );

        Ok(Self {
            format: *format,
            strategy,
        })
    }

    /// Format this codec was built for.
    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    /// True when sub-byte masking wraps the base strategy.
    pub fn is_masked(&self) -> bool {
        matches!(self.strategy, Strategy::Masked(_))
    }

    /// Decode every whole sample in `bytes`.
    ///
    /// Trailing bytes that do not form a complete sample are ignored.
    pub fn decode_to_vec(&mut self, bytes: &[u8]) -> Result<Vec<f64>> {
        let count = bytes.len() / self.bytes_per_sample();
        let mut out = vec![0.0; count];
        self.decode(bytes, 0, &mut out, 0, count)?;
        Ok(out)
    }

    /// Encode all of `samples` into a fresh byte vector.
    pub fn encode_to_vec(&mut self, samples: &[f64]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; samples.len() * self.bytes_per_sample()];
        self.encode(samples, 0, samples.len(), &mut out, 0)?;
        Ok(out)
    }

    fn inner(&mut self) -> &mut dyn PcmConvert {
        match &mut self.strategy {
            Strategy::Integer(c) => c,
            Strategy::Float(c) => c,
            Strategy::Masked(c) => c,
        }
    }
}

impl PcmConvert for SampleCodec {
    fn bytes_per_sample(&self) -> usize {
        self.format.bytes_per_sample()
    }

    fn decode(
        &mut self,
        bytes: &[u8],
        byte_offset: usize,
        out: &mut [f64],
        out_offset: usize,
        count: usize,
    ) -> Result<()> {
        self.inner().decode(bytes, byte_offset, out, out_offset, count)
    }

    fn encode(
        &mut self,
        samples: &[f64],
        sample_offset: usize,
        count: usize,
        out: &mut [u8],
        byte_offset: usize,
    ) -> Result<()> {
        self.inner().encode(samples, sample_offset, count, out, byte_offset)
    }
}

/// Verify that `len` elements starting at `offset` fit in a buffer of `available`.
pub(crate) fn check_span(available: usize, offset: usize, len: usize) -> Result<()> {
    let needed = offset.checked_add(len).ok_or(CodecError::BufferTooShort {
        needed: usize::MAX,
        available,
    })?;
    if needed > available {
        return Err(CodecError::BufferTooShort { needed, available });
    }
    Ok(())
}

/// Byte length of `count` samples of `bytes_per_sample` each.
pub(crate) fn byte_span(count: usize, bytes_per_sample: usize) -> Result<usize> {
    count
        .checked_mul(bytes_per_sample)
        .ok_or(CodecError::BufferTooShort {
            needed: usize::MAX,
            available: 0,
        })
}
