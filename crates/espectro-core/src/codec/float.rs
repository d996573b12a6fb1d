//! IEEE 754 float PCM strategies.

use super::{PcmConvert, byte_span, check_span};
use crate::error::Result;
use crate::format::ByteOrder;

/// 32- or 64-bit float codec. Values pass through without clamping.
#[derive(Debug, Clone)]
pub(crate) struct FloatCodec {
    double: bool,
    order: ByteOrder,
}

impl FloatCodec {
    pub(crate) fn single(order: ByteOrder) -> Self {
        Self {
            double: false,
            order,
        }
    }

    pub(crate) fn double(order: ByteOrder) -> Self {
        Self { double: true, order }
    }

    fn read(&self, s: &[u8]) -> f64 {
        if self.double {
            let word = [s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]];
            match self.order {
                ByteOrder::Little => f64::from_le_bytes(word),
                ByteOrder::Big => f64::from_be_bytes(word),
            }
        } else {
            let word = [s[0], s[1], s[2], s[3]];
            f64::from(match self.order {
                ByteOrder::Little => f32::from_le_bytes(word),
                ByteOrder::Big => f32::from_be_bytes(word),
            })
        }
    }

    fn write(&self, x: f64, s: &mut [u8]) {
        match (self.double, self.order) {
            (true, ByteOrder::Little) => s.copy_from_slice(&x.to_le_bytes()),
            (true, ByteOrder::Big) => s.copy_from_slice(&x.to_be_bytes()),
            (false, ByteOrder::Little) => s.copy_from_slice(&(x as f32).to_le_bytes()),
            (false, ByteOrder::Big) => s.copy_from_slice(&(x as f32).to_be_bytes()),
        }
    }
}

impl PcmConvert for FloatCodec {
    fn bytes_per_sample(&self) -> usize {
        if self.double { 8 } else { 4 }
    }

    fn decode(
        &mut self,
        bytes: &[u8],
        byte_offset: usize,
        out: &mut [f64],
        out_offset: usize,
        count: usize,
    ) -> Result<()> {
        let bps = self.bytes_per_sample();
        let span = byte_span(count, bps)?;
        check_span(bytes.len(), byte_offset, span)?;
        check_span(out.len(), out_offset, count)?;

        for (chunk, slot) in bytes[byte_offset..byte_offset + span]
            .chunks_exact(bps)
            .zip(&mut out[out_offset..out_offset + count])
        {
            *slot = self.read(chunk);
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
        let bps = self.bytes_per_sample();
        let span = byte_span(count, bps)?;
        check_span(samples.len(), sample_offset, count)?;
        check_span(out.len(), byte_offset, span)?;

        for (&x, chunk) in samples[sample_offset..sample_offset + count]
            .iter()
            .zip(out[byte_offset..byte_offset + span].chunks_exact_mut(bps))
        {
            self.write(x, chunk);
        }
        Ok(())
    }
}
