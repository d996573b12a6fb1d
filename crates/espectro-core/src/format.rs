//! Audio format descriptor.
//!
//! An [`AudioFormat`] describes how raw PCM bytes are laid out: sample rate,
//! channel count, bit depth, encoding, byte order, and the size of one
//! multi-channel frame. It is supplied by whatever decoded the container and
//! is never modified afterwards.

use core::fmt;

use crate::error::{CodecError, Result};

/// Sample encoding kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Two's complement signed integers.
    SignedInt,
    /// Unsigned integers biased by half the code range.
    UnsignedInt,
    /// IEEE 754 floating point.
    Float,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::SignedInt => "signed integer",
            Encoding::UnsignedInt => "unsigned integer",
            Encoding::Float => "float",
        };
        f.write_str(name)
    }
}

/// Byte order of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// Immutable description of a PCM byte stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFormat {
    sample_rate: f64,
    channels: usize,
    bits_per_sample: u32,
    encoding: Encoding,
    byte_order: ByteOrder,
    frame_size: usize,
}

impl AudioFormat {
    /// Create a format whose frame size is derived from channels and depth.
    pub fn new(
        sample_rate: f64,
        channels: usize,
        bits_per_sample: u32,
        encoding: Encoding,
        byte_order: ByteOrder,
    ) -> Self {
        let frame_size = channels * bytes_for_bits(bits_per_sample);
        Self {
            sample_rate,
            channels,
            bits_per_sample,
            encoding,
            byte_order,
            frame_size,
        }
    }

    /// Signed integer PCM.
    pub fn signed(sample_rate: f64, channels: usize, bits: u32, byte_order: ByteOrder) -> Self {
        Self::new(sample_rate, channels, bits, Encoding::SignedInt, byte_order)
    }

    /// Unsigned integer PCM.
    pub fn unsigned(sample_rate: f64, channels: usize, bits: u32, byte_order: ByteOrder) -> Self {
        Self::new(sample_rate, channels, bits, Encoding::UnsignedInt, byte_order)
    }

    /// IEEE float PCM.
    pub fn float(sample_rate: f64, channels: usize, bits: u32, byte_order: ByteOrder) -> Self {
        Self::new(sample_rate, channels, bits, Encoding::Float, byte_order)
    }

    /// Override the frame size reported by an external decoder.
    ///
    /// The value is not checked here; codec construction rejects a frame
    /// size that disagrees with channels and depth.
    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Declared bit depth per sample.
    pub fn bits_per_sample(&self) -> u32 {
        self.bits_per_sample
    }

    /// Sample encoding.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Byte order of multi-byte samples.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Bytes per multi-channel frame.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Bytes occupied by one sample, `ceil(bits / 8)`.
    pub fn bytes_per_sample(&self) -> usize {
        bytes_for_bits(self.bits_per_sample)
    }

    /// Check the invariants every codec relies on.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(CodecError::invalid_format(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.channels == 0 {
            return Err(CodecError::invalid_format("channel count must be at least 1"));
        }
        if self.bits_per_sample == 0 {
            return Err(CodecError::invalid_format("bit depth must be at least 1"));
        }
        let expected = self.channels * self.bytes_per_sample();
        if self.frame_size != expected {
            return Err(CodecError::invalid_format(format!(
                "frame size {} does not match {} channels of {} bits (expected {})",
                self.frame_size, self.channels, self.bits_per_sample, expected
            )));
        }
        Ok(())
    }
}

/// Whole bytes needed to hold `bits`.
pub(crate) fn bytes_for_bits(bits: u32) -> usize {
    bits.div_ceil(8) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_size_derived_from_depth() {
        let format = AudioFormat::signed(44100.0, 2, 24, ByteOrder::Little);
        assert_eq!(format.bytes_per_sample(), 3);
        assert_eq!(format.frame_size(), 6);
        assert!(format.validate().is_ok());
    }

    #[test]
    fn sub_byte_depth_rounds_up() {
        let format = AudioFormat::signed(8000.0, 1, 12, ByteOrder::Big);
        assert_eq!(format.bytes_per_sample(), 2);
        assert_eq!(format.frame_size(), 2);
    }

    #[test]
    fn mismatched_frame_size_rejected() {
        let format = AudioFormat::signed(48000.0, 2, 16, ByteOrder::Little).with_frame_size(3);
        assert!(matches!(
            format.validate(),
            Err(CodecError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn zero_channels_rejected() {
        let format = AudioFormat::signed(48000.0, 0, 16, ByteOrder::Little);
        assert!(format.validate().is_err());
    }

    #[test]
    fn non_positive_sample_rate_rejected() {
        let format = AudioFormat::float(0.0, 1, 32, ByteOrder::Little);
        assert!(format.validate().is_err());
        let format = AudioFormat::float(f64::NAN, 1, 32, ByteOrder::Little);
        assert!(format.validate().is_err());
    }
}
