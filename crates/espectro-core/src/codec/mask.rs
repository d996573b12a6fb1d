//! Sub-byte depth masking.

use super::{PcmConvert, byte_span, check_span};
use crate::error::Result;
use crate::format::{ByteOrder, bytes_for_bits};

/// Clears the unused low-order bits of each sample around an inner codec.
///
/// For a depth of `b` bits that is not a multiple of 8, the least
/// significant byte of every sample is ANDed with
/// `0xFF << (8 - b % 8)`: 12 bits gives `0xF0`, 1 bit gives `0x80`.
///
/// Decoding copies the input into an internal scratch buffer before masking,
/// so the caller's bytes are never modified. Encoding masks the output in
/// place after the inner codec has written it.
#[derive(Debug, Clone)]
pub struct LsbMask<C> {
    inner: C,
    mask: u8,
    /// Offset of the least significant byte within one sample.
    lsb_offset: usize,
    scratch: Vec<u8>,
}

impl<C: PcmConvert> LsbMask<C> {
    /// Wrap `inner` for samples of `bits` significant bits in `order`.
    ///
    /// When `bits` is a multiple of 8 the mask is `0xFF` and the adapter is
    /// transparent.
    pub fn new(inner: C, bits: u32, order: ByteOrder) -> Self {
        let rem = bits % 8;
        let mask = if rem == 0 {
            0xFF
        } else {
            (0xFF_u16 << (8 - rem)) as u8
        };
        let bytes = bytes_for_bits(bits).max(inner.bytes_per_sample());
        let lsb_offset = match order {
            ByteOrder::Little => 0,
            ByteOrder::Big => bytes - 1,
        };
        Self {
            inner,
            mask,
            lsb_offset,
            scratch: Vec::new(),
        }
    }

    /// Mask applied to the least significant byte.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// The wrapped codec.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn apply(&self, bytes: &mut [u8]) {
        let bps = self.inner.bytes_per_sample();
        for sample in bytes.chunks_exact_mut(bps) {
            sample[self.lsb_offset] &= self.mask;
        }
    }
}

impl<C: PcmConvert> PcmConvert for LsbMask<C> {
    fn bytes_per_sample(&self) -> usize {
        self.inner.bytes_per_sample()
    }

    fn decode(
        &mut self,
        bytes: &[u8],
        byte_offset: usize,
        out: &mut [f64],
        out_offset: usize,
        count: usize,
    ) -> Result<()> {
        let span = byte_span(count, self.inner.bytes_per_sample())?;
        check_span(bytes.len(), byte_offset, span)?;

        if self.scratch.len() < span {
            self.scratch.resize(span, 0);
        }
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch[..span].copy_from_slice(&bytes[byte_offset..byte_offset + span]);
        self.apply(&mut scratch[..span]);
        let result = self
            .inner
            .decode(&scratch[..span], 0, out, out_offset, count);
        self.scratch = scratch;
        result
    }

    fn encode(
        &mut self,
        samples: &[f64],
        sample_offset: usize,
        count: usize,
        out: &mut [u8],
        byte_offset: usize,
    ) -> Result<()> {
        self.inner
            .encode(samples, sample_offset, count, out, byte_offset)?;
        let span = byte_span(count, self.inner.bytes_per_sample())?;
        self.apply(&mut out[byte_offset..byte_offset + span]);
        Ok(())
    }
}
