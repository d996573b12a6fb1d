//! Frequency scales
//!
//! Each [`ScaleType`] is a pair of monotonic functions mapping Hz onto a
//! perceptual or logarithmic axis and back.
//!
//! | Scale | Forward |
//! |-------|---------|
//! | linear | `hz` |
//! | log | `log10(max(1, hz))` |
//! | mel | `2595 * log10(1 + hz / 700)` |
//! | bark | Traunmüller with low/high boundary corrections |
//! | erb | `A * log10(1 + 0.00437 * hz)` |

use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};

/// Frequency scale used to space filter-bank centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleType {
    /// Identity mapping.
    Linear,
    /// Base-10 logarithm, flat below 1 Hz.
    Logarithmic,
    /// Mel scale.
    #[default]
    Mel,
    /// Bark critical-band scale.
    Bark,
    /// Equivalent rectangular bandwidth rate.
    Erb,
}

/// `1000 * ln(10) / (24.7 * 4.37)`
fn erb_factor() -> f64 {
    1000.0 * std::f64::consts::LN_10 / (24.7 * 4.37)
}

impl ScaleType {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            ScaleType::Linear => "linear",
            ScaleType::Logarithmic => "log",
            ScaleType::Mel => "mel",
            ScaleType::Bark => "bark",
            ScaleType::Erb => "erb",
        }
    }

    /// Map a frequency in Hz onto this scale.
    pub fn forward(&self, hz: f64) -> f64 {
        match self {
            ScaleType::Linear => hz,
            ScaleType::Logarithmic => hz.max(1.0).log10(),
            ScaleType::Mel => 2595.0 * (1.0 + hz / 700.0).log10(),
            ScaleType::Bark => {
                let bark = 26.81 * hz / (1960.0 + hz) - 0.53;
                if bark < 2.0 {
                    bark + 0.15 * (2.0 - bark)
                } else if bark > 20.1 {
                    bark + 0.22 * (bark - 20.1)
                } else {
                    bark
                }
            }
            ScaleType::Erb => erb_factor() * (1.0 + 0.00437 * hz).log10(),
        }
    }

    /// Map a value on this scale back to Hz.
    pub fn inverse(&self, value: f64) -> f64 {
        match self {
            ScaleType::Linear => value,
            ScaleType::Logarithmic => 10f64.powf(value),
            ScaleType::Mel => 700.0 * (10f64.powf(value / 2595.0) - 1.0),
            ScaleType::Bark => {
                let bark = if value < 2.0 {
                    (value - 0.3) / 0.85
                } else if value > 20.1 {
                    (value + 4.422) / 1.22
                } else {
                    value
                };
                1960.0 * (bark + 0.53) / (26.28 - bark)
            }
            ScaleType::Erb => (10f64.powf(value / erb_factor()) - 1.0) / 0.00437,
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(ScaleType::Linear),
            "log" | "logarithmic" => Ok(ScaleType::Logarithmic),
            "mel" => Ok(ScaleType::Mel),
            "bark" => Ok(ScaleType::Bark),
            "erb" => Ok(ScaleType::Erb),
            _ => Err(AnalysisError::invalid_configuration(format!(
                "unknown frequency scale '{s}'"
            ))),
        }
    }
}

/// Axis label text for a frequency: `"440 Hz"` below 1 kHz, `"1.2 kHz"` above.
pub fn format_hz(hz: f64) -> String {
    if hz >= 1000.0 {
        format!("{:.1} kHz", hz / 1000.0)
    } else {
        format!("{} Hz", hz.round() as i64)
    }
}
