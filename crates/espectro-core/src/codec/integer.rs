//! Integer PCM strategies.

use super::{PaddingPolicy, PcmConvert, byte_span, check_span};
use crate::error::Result;
use crate::format::ByteOrder;

/// Container layout of one integer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    Int8,
    Int16,
    Int24,
    Int32,
    /// 32 significant bits plus `padding` ignored bytes.
    Int32Padded {
        padding: usize,
        policy: PaddingPolicy,
    },
}

impl Layout {
    /// Width in bits of the quantized value.
    fn value_bits(self) -> u32 {
        match self {
            Layout::Int8 => 8,
            Layout::Int16 => 16,
            Layout::Int24 => 24,
            Layout::Int32 | Layout::Int32Padded { .. } => 32,
        }
    }

    fn bytes(self) -> usize {
        match self {
            Layout::Int8 => 1,
            Layout::Int16 => 2,
            Layout::Int24 => 3,
            Layout::Int32 => 4,
            Layout::Int32Padded { padding, .. } => 4 + padding,
        }
    }

    /// Offset of the four value bytes inside a padded sample.
    fn value_offset(self, order: ByteOrder) -> usize {
        match self {
            Layout::Int32Padded { padding, policy } => match (policy, order) {
                (PaddingPolicy::LeastSignificant, ByteOrder::Little)
                | (PaddingPolicy::MostSignificant, ByteOrder::Big) => padding,
                _ => 0,
            },
            _ => 0,
        }
    }
}

/// Signed or unsigned integer codec for one container layout and byte order.
#[derive(Debug, Clone)]
pub(crate) struct IntegerCodec {
    layout: Layout,
    signed: bool,
    order: ByteOrder,
    /// Largest positive code, `2^(b-1) - 1`.
    pos_max: f64,
    /// Magnitude of the most negative code, `2^(b-1)`.
    neg_max: f64,
}

impl IntegerCodec {
    pub(crate) fn new(layout: Layout, signed: bool, order: ByteOrder) -> Self {
        let half = (1u64 << (layout.value_bits() - 1)) as f64;
        Self {
            layout,
            signed,
            order,
            pos_max: half - 1.0,
            neg_max: half,
        }
    }

    fn bias(&self) -> i64 {
        1i64 << (self.layout.value_bits() - 1)
    }

    /// Raw container bits, zero-extended.
    fn read_raw(&self, s: &[u8]) -> u32 {
        match (self.layout, self.order) {
            (Layout::Int8, _) => u32::from(s[0]),
            (Layout::Int16, ByteOrder::Little) => u32::from(u16::from_le_bytes([s[0], s[1]])),
            (Layout::Int16, ByteOrder::Big) => u32::from(u16::from_be_bytes([s[0], s[1]])),
            (Layout::Int24, ByteOrder::Little) => u32::from_le_bytes([s[0], s[1], s[2], 0]),
            (Layout::Int24, ByteOrder::Big) => u32::from_be_bytes([0, s[0], s[1], s[2]]),
            (layout, order) => {
                let at = layout.value_offset(order);
                let word = [s[at], s[at + 1], s[at + 2], s[at + 3]];
                match order {
                    ByteOrder::Little => u32::from_le_bytes(word),
                    ByteOrder::Big => u32::from_be_bytes(word),
                }
            }
        }
    }

    fn write_raw(&self, raw: u32, s: &mut [u8]) {
        match (self.layout, self.order) {
            (Layout::Int8, _) => s[0] = raw as u8,
            (Layout::Int16, ByteOrder::Little) => s.copy_from_slice(&(raw as u16).to_le_bytes()),
            (Layout::Int16, ByteOrder::Big) => s.copy_from_slice(&(raw as u16).to_be_bytes()),
            (Layout::Int24, ByteOrder::Little) => s.copy_from_slice(&raw.to_le_bytes()[..3]),
            (Layout::Int24, ByteOrder::Big) => s.copy_from_slice(&raw.to_be_bytes()[1..]),
            (layout, order) => {
                s.fill(0);
                let at = layout.value_offset(order);
                let word = match order {
                    ByteOrder::Little => raw.to_le_bytes(),
                    ByteOrder::Big => raw.to_be_bytes(),
                };
                s[at..at + 4].copy_from_slice(&word);
            }
        }
    }

    /// Signed code held in `raw`.
    fn to_code(&self, raw: u32) -> i64 {
        let bits = self.layout.value_bits();
        if self.signed {
            let shift = 32 - bits;
            i64::from(((raw << shift) as i32) >> shift)
        } else {
            i64::from(raw) - self.bias()
        }
    }

    fn from_code(&self, code: i64) -> u32 {
        if self.signed {
            // two's complement, truncated to the container
            let bits = self.layout.value_bits();
            let mask = if bits == 32 { u32::MAX } else { (1u32 << bits) - 1 };
            (code as u32) & mask
        } else {
            (code + self.bias()) as u32
        }
    }

    fn normalize(&self, code: i64) -> f64 {
        let v = code as f64;
        if v > 0.0 { v / self.pos_max } else { v / self.neg_max }
    }

    fn quantize(&self, x: f64) -> i64 {
        if x.is_nan() {
            return 0;
        }
        let x = x.clamp(-1.0, 1.0);
        // `as` truncates toward zero
        if x > 0.0 {
            (x * self.pos_max) as i64
        } else {
            (x * self.neg_max) as i64
        }
    }
}

impl PcmConvert for IntegerCodec {
    fn bytes_per_sample(&self) -> usize {
        self.layout.bytes()
    }

    fn decode(
        &mut self,
        bytes: &[u8],
        byte_offset: usize,
        out: &mut [f64],
        out_offset: usize,
        count: usize,
    ) -> Result<()> {
        let bps = self.layout.bytes();
        let span = byte_span(count, bps)?;
        check_span(bytes.len(), byte_offset, span)?;
        check_span(out.len(), out_offset, count)?;

        let input = &bytes[byte_offset..byte_offset + span];
        for (chunk, slot) in input
            .chunks_exact(bps)
            .zip(&mut out[out_offset..out_offset + count])
        {
            *slot = self.normalize(self.to_code(self.read_raw(chunk)));
        }
        Ok(())
    }

    fn encode(
        &mut self,
        samples: &[f64],
        sample_offset: usize,
        count: usize,
        out: &mut [u8],
        byte_offset: usize,
    ) -> Result<()> {
        let bps = self.layout.bytes();
        let span = byte_span(count, bps)?;
        check_span(samples.len(), sample_offset, count)?;
        check_span(out.len(), byte_offset, span)?;

        let output = &mut out[byte_offset..byte_offset + span];
        for (&x, chunk) in samples[sample_offset..sample_offset + count]
            .iter()
            .zip(output.chunks_exact_mut(bps))
        {
            let raw = self.from_code(self.quantize(x));
            self.write_raw(raw, chunk);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(codec: &mut IntegerCodec, bytes: &[u8]) -> f64 {
        let mut out = [0.0];
        codec.decode(bytes, 0, &mut out, 0, 1).unwrap();
        out[0]
    }

    fn encode_one(codec: &mut IntegerCodec, x: f64) -> Vec<u8> {
        let mut out = vec![0u8; codec.bytes_per_sample()];
        codec.encode(&[x], 0, 1, &mut out, 0).unwrap();
        out
    }

    #[test]
    fn signed_16_little_endian_extremes() {
        let mut codec = IntegerCodec::new(Layout::Int16, true, ByteOrder::Little);
        assert_eq!(decode_one(&mut codec, &[0xFF, 0x7F]), 1.0);
        assert_eq!(decode_one(&mut codec, &[0x00, 0x80]), -1.0);
        assert_eq!(decode_one(&mut codec, &[0x00, 0x00]), 0.0);
        assert_eq!(encode_one(&mut codec, 1.0), [0xFF, 0x7F]);
        assert_eq!(encode_one(&mut codec, -1.0), [0x00, 0x80]);
    }

    #[test]
    fn unsigned_16_big_endian_bias() {
        let mut codec = IntegerCodec::new(Layout::Int16, false, ByteOrder::Big);
        assert_eq!(decode_one(&mut codec, &[0x80, 0x00]), 0.0);
        assert_eq!(decode_one(&mut codec, &[0xFF, 0xFF]), 1.0);
        assert_eq!(decode_one(&mut codec, &[0x00, 0x00]), -1.0);
        assert_eq!(encode_one(&mut codec, 0.0), [0x80, 0x00]);
    }

    #[test]
    fn eight_bit_both_signedness() {
        let mut unsigned = IntegerCodec::new(Layout::Int8, false, ByteOrder::Little);
        assert_eq!(decode_one(&mut unsigned, &[128]), 0.0);
        assert_eq!(decode_one(&mut unsigned, &[255]), 1.0);
        assert_eq!(decode_one(&mut unsigned, &[0]), -1.0);

        let mut signed = IntegerCodec::new(Layout::Int8, true, ByteOrder::Big);
        assert_eq!(decode_one(&mut signed, &[0x7F]), 1.0);
        assert_eq!(decode_one(&mut signed, &[0x80]), -1.0);
        assert_eq!(encode_one(&mut signed, -0.5), [0xC0]);
    }

    #[test]
    fn twenty_four_bit_layouts() {
        let mut le = IntegerCodec::new(Layout::Int24, true, ByteOrder::Little);
        assert_eq!(decode_one(&mut le, &[0xFF, 0xFF, 0x7F]), 1.0);
        assert_eq!(decode_one(&mut le, &[0x00, 0x00, 0x80]), -1.0);

        let mut be = IntegerCodec::new(Layout::Int24, true, ByteOrder::Big);
        assert_eq!(encode_one(&mut be, 1.0), [0x7F, 0xFF, 0xFF]);
        assert_eq!(encode_one(&mut be, -1.0), [0x80, 0x00, 0x00]);

        let mut unsigned = IntegerCodec::new(Layout::Int24, false, ByteOrder::Little);
        assert_eq!(encode_one(&mut unsigned, -1.0), [0, 0, 0]);
        assert_eq!(decode_one(&mut unsigned, &[0, 0, 0]), -1.0);
    }

    #[test]
    fn thirty_two_bit_asymmetric() {
        let mut codec = IntegerCodec::new(Layout::Int32, true, ByteOrder::Big);
        assert_eq!(decode_one(&mut codec, &[0x7F, 0xFF, 0xFF, 0xFF]), 1.0);
        assert_eq!(decode_one(&mut codec, &[0x80, 0x00, 0x00, 0x00]), -1.0);
        assert_eq!(encode_one(&mut codec, -1.0), [0x80, 0, 0, 0]);

        let mut unsigned = IntegerCodec::new(Layout::Int32, false, ByteOrder::Little);
        assert_eq!(encode_one(&mut unsigned, 1.0), [0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(decode_one(&mut unsigned, &[0, 0, 0, 0x80]), 0.0);
    }

    #[test]
    fn padded_low_order_padding() {
        let layout = Layout::Int32Padded {
            padding: 1,
            policy: PaddingPolicy::LeastSignificant,
        };
        let mut le = IntegerCodec::new(layout, true, ByteOrder::Little);
        assert_eq!(encode_one(&mut le, 1.0), [0x00, 0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(decode_one(&mut le, &[0xAB, 0xFF, 0xFF, 0xFF, 0x7F]), 1.0);

        let mut be = IntegerCodec::new(layout, true, ByteOrder::Big);
        assert_eq!(encode_one(&mut be, 1.0), [0x7F, 0xFF, 0xFF, 0xFF, 0x00]);
        assert_eq!(decode_one(&mut be, &[0x80, 0, 0, 0, 0xCD]), -1.0);
    }

    #[test]
    fn padded_high_order_padding() {
        let layout = Layout::Int32Padded {
            padding: 4,
            policy: PaddingPolicy::MostSignificant,
        };
        let mut le = IntegerCodec::new(layout, true, ByteOrder::Little);
        assert_eq!(
            encode_one(&mut le, 1.0),
            [0xFF, 0xFF, 0xFF, 0x7F, 0, 0, 0, 0]
        );

        let mut be = IntegerCodec::new(layout, true, ByteOrder::Big);
        assert_eq!(
            encode_one(&mut be, 1.0),
            [0, 0, 0, 0, 0x7F, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn encode_clamps_and_maps_nan_to_zero() {
        let mut codec = IntegerCodec::new(Layout::Int16, true, ByteOrder::Little);
        assert_eq!(encode_one(&mut codec, 2.5), [0xFF, 0x7F]);
        assert_eq!(encode_one(&mut codec, -7.0), [0x00, 0x80]);
        assert_eq!(encode_one(&mut codec, f64::NAN), [0x00, 0x00]);
    }

    #[test]
    fn encode_truncates_toward_zero() {
        let mut codec = IntegerCodec::new(Layout::Int8, true, ByteOrder::Little);
        // 0.999 * 127 = 126.873 -> 126
        assert_eq!(encode_one(&mut codec, 0.999), [126]);
        // -0.999 * 128 = -127.872 -> -127
        assert_eq!(encode_one(&mut codec, -0.999), [(-127i8) as u8]);
    }
}
