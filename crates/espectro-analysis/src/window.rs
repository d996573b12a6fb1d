//! Tapering window functions
//!
//! Every window is a pure function of `(length, index)`. Symmetric forms are
//! used throughout: the denominator is `length - 1`, so the first and last
//! coefficients mirror each other.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};

/// Default alpha for [`WindowFunction::Blackman`].
pub const DEFAULT_BLACKMAN_ALPHA: f64 = 0.16;

/// Default alpha for [`WindowFunction::Gauss`].
pub const DEFAULT_GAUSS_ALPHA: f64 = 0.25;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WindowFunction {
    /// Rectangular (no windowing)
    Rectangular,
    /// Triangular, non-zero at the edges
    Triangular,
    /// Hann window (raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
    /// Bartlett window, zero at the edges
    Bartlett,
    /// Bartlett-Hann window
    BartlettHann,
    /// Half-period sine
    Cosine,
    /// Lanczos (sinc) window
    Lanczos,
    /// Generalized Blackman window
    Blackman {
        /// Shape parameter.
        alpha: f64,
    },
    /// Gaussian window
    Gauss {
        /// Width relative to half the window length.
        alpha: f64,
    },
}

impl WindowFunction {
    /// Look up a window by name, applying `alpha` to the parameterized ones.
    ///
    /// Matching is case-insensitive and an empty name selects Hann.
    pub fn from_name(name: &str, alpha: Option<f64>) -> Result<Self> {
        let window = match name.trim().to_ascii_lowercase().as_str() {
            "" | "hann" | "hanning" => WindowFunction::Hann,
            "rectangular" | "rect" | "none" => WindowFunction::Rectangular,
            "triangular" | "triangle" => WindowFunction::Triangular,
            "hamming" => WindowFunction::Hamming,
            "bartlett" => WindowFunction::Bartlett,
            "bartletthann" | "bartlett-hann" | "bartlett_hann" => WindowFunction::BartlettHann,
            "cosine" | "sine" => WindowFunction::Cosine,
            "lanczos" | "lanczoz" => WindowFunction::Lanczos,
            "blackman" => WindowFunction::Blackman {
                alpha: alpha.unwrap_or(DEFAULT_BLACKMAN_ALPHA),
            },
            "gauss" | "gaussian" => WindowFunction::Gauss {
                alpha: alpha.unwrap_or(DEFAULT_GAUSS_ALPHA),
            },
            _ => return Err(AnalysisError::UnsupportedWindow(name.to_string())),
        };
        if let WindowFunction::Gauss { alpha } = window
            && (!alpha.is_finite() || alpha <= 0.0)
        {
            return Err(AnalysisError::invalid_configuration(format!(
                "gauss window alpha must be positive, got {alpha}"
            )));
        }
        Ok(window)
    }

    /// Canonical name, accepted by [`from_name`](Self::from_name).
    pub fn name(&self) -> &'static str {
        match self {
            WindowFunction::Rectangular => "rectangular",
            WindowFunction::Triangular => "triangular",
            WindowFunction::Hann => "hann",
            WindowFunction::Hamming => "hamming",
            WindowFunction::Bartlett => "bartlett",
            WindowFunction::BartlettHann => "bartlett-hann",
            WindowFunction::Cosine => "cosine",
            WindowFunction::Lanczos => "lanczos",
            WindowFunction::Blackman { .. } => "blackman",
            WindowFunction::Gauss { .. } => "gauss",
        }
    }

    /// Coefficient at `index` of a window of `length` samples.
    pub fn coefficient(&self, length: usize, index: usize) -> f64 {
        if length <= 1 {
            return 1.0;
        }
        let i = index as f64;
        let m = (length - 1) as f64;
        let half = m / 2.0;

        match *self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Triangular => {
                let l = length as f64;
                2.0 / l * (l / 2.0 - (i - half).abs())
            }
            WindowFunction::Hann => 0.5 * (1.0 - (2.0 * PI * i / m).cos()),
            WindowFunction::Hamming => 0.54 - 0.46 * (2.0 * PI * i / m).cos(),
            WindowFunction::Bartlett => 2.0 / m * (half - (i - half).abs()),
            WindowFunction::BartlettHann => {
                0.62 - 0.48 * (i / m - 0.5).abs() - 0.38 * (2.0 * PI * i / m).cos()
            }
            WindowFunction::Cosine => (PI * i / m - PI / 2.0).cos(),
            WindowFunction::Lanczos => sinc(2.0 * i / m - 1.0),
            WindowFunction::Blackman { alpha } => {
                (1.0 - alpha) / 2.0 - 0.5 * (2.0 * PI * i / m).cos()
                    + alpha / 2.0 * (4.0 * PI * i / m).cos()
            }
            WindowFunction::Gauss { alpha } => {
                let x = (i - half) / (alpha * half);
                (-0.5 * x * x).exp()
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        (0..size).map(|i| self.coefficient(size, i)).collect()
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let n = buffer.len();
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.coefficient(n, i);
        }
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowFunction {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s, None)
    }
}
