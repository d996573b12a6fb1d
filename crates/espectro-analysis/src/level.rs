//! Level measurement and decibel mapping
//!
//! The analyzer stores raw decibels; consumers use [`clamp_db`] and
//! [`normalized_level`] to fit them into a display range.

/// Magnitudes below this are floored before taking a logarithm.
pub const MAGNITUDE_FLOOR: f64 = 1e-12;

/// Compute RMS (Root Mean Square) level of a signal
///
/// Returns RMS value in linear scale (not dB)
pub fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = signal.iter().map(|&x| x * x).sum();
    (sum_sq / signal.len() as f64).sqrt()
}

/// Compute peak level (maximum absolute value)
pub fn peak(signal: &[f64]) -> f64 {
    signal.iter().map(|x| x.abs()).fold(0.0, f64::max)
}

/// `20 * log10(max(|value|, 1e-12)) + gain`
pub fn amplitude_to_db(value: f64, gain: f64) -> f64 {
    20.0 * value.abs().max(MAGNITUDE_FLOOR).log10() + gain
}

/// Compute RMS level in dB
pub fn rms_db(signal: &[f64], gain: f64) -> f64 {
    amplitude_to_db(rms(signal), gain)
}

/// Clamp a level into `[-range, 0]` dB.
pub fn clamp_db(db: f64, range: f64) -> f64 {
    db.clamp(-range.abs(), 0.0)
}

/// Map a level onto `[0, 1]`, where `-range` dB is 0 and 0 dB is 1.
pub fn normalized_level(db: f64, range: f64) -> f64 {
    let range = range.abs();
    if range == 0.0 {
        return if db >= 0.0 { 1.0 } else { 0.0 };
    }
    clamp_db(db, range) / range + 1.0
}
