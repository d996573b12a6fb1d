//! Radix-2 FFT with fused windowing
//!
//! [`SpectralTransform`] precomputes its bit-reversal table, per-stage
//! twiddle factors and window coefficients once, then turns each frame of
//! exactly `size` samples into a magnitude spectrum of `size / 2` bins.

use rustfft::num_complex::Complex;

use crate::error::{AnalysisError, Result};
use crate::window::WindowFunction;

/// Iterative decimation-in-time FFT of a fixed power-of-two size.
#[derive(Debug, Clone)]
pub struct SpectralTransform {
    size: usize,
    window: WindowFunction,
    coefficients: Vec<f64>,
    reverse: Vec<usize>,
    /// `(cos(-π/k), sin(-π/k))` for each half-size `k = 1, 2, 4, ...`
    twiddles: Vec<(f64, f64)>,
}

impl SpectralTransform {
    /// Create a transform for frames of `size` samples tapered by `window`.
    ///
    /// `size` must be a power of two and at least 2.
    pub fn new(size: usize, window: WindowFunction) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(AnalysisError::invalid_configuration(format!(
                "FFT size must be a power of two >= 2, got {size}"
            )));
        }

        let mut reverse = vec![0usize; size];
        let mut limit = 1;
        let mut bit = size >> 1;
        while limit < size {
            for i in 0..limit {
                reverse[i + limit] = reverse[i] + bit;
            }
            limit <<= 1;
            bit >>= 1;
        }

        let mut twiddles = Vec::with_capacity(size.trailing_zeros() as usize);
        let mut half = 1;
        while half < size {
            let angle = -std::f64::consts::PI / half as f64;
            twiddles.push((angle.cos(), angle.sin()));
            half <<= 1;
        }

        Ok(Self {
            size,
            window,
            coefficients: window.coefficients(size),
            reverse,
            twiddles,
        })
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of magnitude bins produced per frame, `size / 2`.
    pub fn num_bins(&self) -> usize {
        self.size / 2
    }

    /// Window applied before the transform.
    pub fn window(&self) -> WindowFunction {
        self.window
    }

    /// Precomputed window coefficients.
    pub fn window_coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Windowed complex spectrum of all `size` bins.
    pub fn spectrum(&self, frame: &[f64]) -> Result<Vec<Complex<f64>>> {
        let mut buffer = vec![Complex::new(0.0, 0.0); self.size];
        self.spectrum_into(frame, &mut buffer)?;
        Ok(buffer)
    }

    /// Windowed complex spectrum written into `buffer`, which must hold `size` values.
    pub fn spectrum_into(&self, frame: &[f64], buffer: &mut [Complex<f64>]) -> Result<()> {
        if frame.len() != self.size {
            return Err(AnalysisError::FrameLength {
                expected: self.size,
                actual: frame.len(),
            });
        }
        if buffer.len() != self.size {
            return Err(AnalysisError::FrameLength {
                expected: self.size,
                actual: buffer.len(),
            });
        }

        // windowing fused with bit-reversal reordering
        for (slot, &src) in buffer.iter_mut().zip(&self.reverse) {
            *slot = Complex::new(frame[src] * self.coefficients[src], 0.0);
        }

        let n = self.size;
        let mut half = 1;
        for &(phase_re, phase_im) in &self.twiddles {
            let phase = Complex::new(phase_re, phase_im);
            let mut w = Complex::new(1.0, 0.0);
            for m in 0..half {
                let mut i = m;
                while i < n {
                    let j = i + half;
                    let t = w * buffer[j];
                    buffer[j] = buffer[i] - t;
                    buffer[i] += t;
                    i += half << 1;
                }
                w *= phase;
            }
            half <<= 1;
        }
        Ok(())
    }

    /// Magnitude spectrum, `(2 / size) * |X[k]|` for the first `size / 2` bins.
    pub fn magnitudes(&self, frame: &[f64]) -> Result<Vec<f64>> {
        let spectrum = self.spectrum(frame)?;
        let scale = 2.0 / self.size as f64;
        Ok(spectrum[..self.num_bins()]
            .iter()
            .map(|c| scale * c.norm())
            .collect())
    }

    /// Get frequency in Hz for a given bin index
    pub fn bin_to_freq(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.size as f64
    }

    /// Strongest bin and its magnitude, or `None` for an empty spectrum.
    pub fn peak(magnitudes: &[f64]) -> Option<(usize, f64)> {
        magnitudes
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }
}
