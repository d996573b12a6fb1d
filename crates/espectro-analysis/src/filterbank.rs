//! Scale-spaced filter bank over linear FFT bins
//!
//! [`ScaleFilterBank`] places `F` filter centres evenly on a [`ScaleType`]
//! axis between 0 Hz and Nyquist. Each filter interpolates linearly between
//! the two FFT bins that bracket its centre, so every row of the weight
//! matrix holds at most two adjacent non-zero weights summing to 1.
//!
//! # Example
//!
//! ```rust
//! use espectro_analysis::{ScaleFilterBank, ScaleType};
//!
//! let bank = ScaleFilterBank::new(ScaleType::Mel, 40, 44100.0, 1024).unwrap();
//! let magnitudes = vec![0.0; 512];
//! let scaled = bank.apply(&magnitudes).unwrap();
//! assert_eq!(scaled.len(), 40);
//! ```

use crate::error::{AnalysisError, Result};
use crate::scale::ScaleType;

/// One sparse filter row: weights at `bin` and `bin + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FilterRow {
    bin: usize,
    lower: f64,
    upper: f64,
}

/// Precomputed interpolation matrix from `fft_size / 2` bins onto `F` filters.
#[derive(Debug, Clone)]
pub struct ScaleFilterBank {
    scale: ScaleType,
    sample_rate: f64,
    fft_size: usize,
    rows: Vec<FilterRow>,
    centers: Vec<f64>,
}

impl ScaleFilterBank {
    /// Build the bank for `num_filters` filters at `sample_rate` over an FFT of `fft_size`.
    pub fn new(
        scale: ScaleType,
        num_filters: usize,
        sample_rate: f64,
        fft_size: usize,
    ) -> Result<Self> {
        if num_filters == 0 {
            return Err(AnalysisError::invalid_configuration(
                "filter count must be at least 1",
            ));
        }
        if fft_size < 2 || !fft_size.is_power_of_two() {
            return Err(AnalysisError::invalid_configuration(format!(
                "FFT size must be a power of two >= 2, got {fft_size}"
            )));
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(AnalysisError::invalid_configuration(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }

        let scale_min = scale.forward(0.0);
        let scale_max = scale.forward(sample_rate / 2.0);
        let bin_width = sample_rate / fft_size as f64;
        let last_bin = fft_size / 2 - 1;

        let mut rows = Vec::with_capacity(num_filters);
        let mut centers = Vec::with_capacity(num_filters);
        for i in 0..num_filters {
            let fraction = i as f64 / num_filters as f64;
            let hz = scale
                .inverse(scale_min + fraction * (scale_max - scale_min))
                .max(0.0);
            let position = hz / bin_width;
            let bin = (position.floor() as usize).min(last_bin);
            let r = (position - bin as f64).clamp(0.0, 1.0);

            rows.push(FilterRow {
                bin,
                lower: 1.0 - r,
                upper: r,
            });
            centers.push(hz);
        }

        tracing::debug!(
            %scale,
            filters = num_filters,
            sample_rate,
            fft_size,
            "filter bank built"
        );

        Ok(Self {
            scale,
            sample_rate,
            fft_size,
            rows,
            centers,
        })
    }

    /// Scale the centres are spaced on.
    pub fn scale(&self) -> ScaleType {
        self.scale
    }

    /// Number of filters `F`.
    pub fn num_filters(&self) -> usize {
        self.rows.len()
    }

    /// Sample rate the bank was built for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// FFT size the bank was built for.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Centre frequency of every filter in Hz.
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Centre frequency of filter `index` in Hz.
    pub fn center_hz(&self, index: usize) -> Option<f64> {
        self.centers.get(index).copied()
    }

    /// Dense `F × (fft_size / 2 + 1)` weight matrix.
    pub fn weights(&self) -> Vec<Vec<f64>> {
        let width = self.fft_size / 2 + 1;
        self.rows
            .iter()
            .map(|row| {
                let mut dense = vec![0.0; width];
                dense[row.bin] = row.lower;
                dense[row.bin + 1] = row.upper;
                dense
            })
            .collect()
    }

    /// Remap a magnitude spectrum onto the filters.
    ///
    /// `magnitudes` holds `fft_size / 2` bins, optionally followed by the
    /// Nyquist bin.
    pub fn apply(&self, magnitudes: &[f64]) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.rows.len()];
        self.apply_into(magnitudes, &mut out)?;
        Ok(out)
    }

    /// Like [`apply`](Self::apply), writing into `out` of length `F`.
    pub fn apply_into(&self, magnitudes: &[f64], out: &mut [f64]) -> Result<()> {
        let bins = self.fft_size / 2;
        if magnitudes.len() < bins {
            return Err(AnalysisError::FrameLength {
                expected: bins,
                actual: magnitudes.len(),
            });
        }
        if out.len() != self.rows.len() {
            return Err(AnalysisError::FrameLength {
                expected: self.rows.len(),
                actual: out.len(),
            });
        }

        for (slot, row) in out.iter_mut().zip(&self.rows) {
            let upper = magnitudes.get(row.bin + 1).copied().unwrap_or(0.0);
            *slot = magnitudes[row.bin] * row.lower + upper * row.upper;
        }
        Ok(())
    }

    /// Map Hz onto the bank's scale.
    pub fn hz_to_scale(&self, hz: f64) -> f64 {
        self.scale.forward(hz)
    }

    /// Map a scale value back to Hz.
    pub fn scale_to_hz(&self, value: f64) -> f64 {
        self.scale.inverse(value)
    }

    /// Frequency at position `index` of an axis `length` units long spanning 0..Nyquist.
    pub fn filter_to_hz(&self, index: usize, length: usize) -> f64 {
        let top = self.scale.forward(self.sample_rate / 2.0);
        self.scale.inverse(index as f64 / length as f64 * top)
    }

    /// Axis position of `hz` on an axis `length` units long spanning 0..Nyquist.
    pub fn hz_to_filter(&self, hz: f64, length: usize) -> usize {
        let top = self.scale.forward(self.sample_rate / 2.0);
        let position = length as f64 * self.scale.forward(hz) / top;
        position.round().max(0.0) as usize
    }
}
