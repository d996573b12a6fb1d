//! Normal-range alarm scan
//!
//! A [`NormalRange`] defines a frequency band and an acceptable level window.
//! Scanning a [`Spectrogram`] reports, per channel, where a filter centred
//! inside the band left that window.

use std::collections::BTreeSet;

use crate::error::{AnalysisError, Result};
use crate::spectrogram::Spectrogram;

/// Frequency band with an acceptable level window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalRange {
    min_hz: f64,
    max_hz: f64,
    min_db: f64,
    max_db: f64,
}

/// Out-of-range findings for one channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlarmReport {
    /// Frames with at least one violation, ascending.
    pub frames: Vec<usize>,
    /// Timestamps of those frames in seconds.
    pub times: Vec<f64>,
    /// Filters that violated in any frame, ascending.
    pub filters: Vec<usize>,
    /// Centre frequencies of those filters in Hz.
    pub frequencies: Vec<f64>,
}

impl AlarmReport {
    /// True when nothing left the window.
    pub fn is_clear(&self) -> bool {
        self.frames.is_empty()
    }
}

impl NormalRange {
    /// Create a range; both bounds pairs must be ordered.
    pub fn new(min_hz: f64, max_hz: f64, min_db: f64, max_db: f64) -> Result<Self> {
        if min_hz.is_nan() || max_hz.is_nan() || min_hz > max_hz {
            return Err(AnalysisError::invalid_configuration(format!(
                "normal range band {min_hz}..{max_hz} Hz is empty"
            )));
        }
        if min_db.is_nan() || max_db.is_nan() || min_db > max_db {
            return Err(AnalysisError::invalid_configuration(format!(
                "normal range window {min_db}..{max_db} dB is empty"
            )));
        }
        Ok(Self {
            min_hz,
            max_hz,
            min_db,
            max_db,
        })
    }

    /// Lower band edge in Hz.
    pub fn min_hz(&self) -> f64 {
        self.min_hz
    }

    /// Upper band edge in Hz.
    pub fn max_hz(&self) -> f64 {
        self.max_hz
    }

    /// Lowest acceptable level in dB.
    pub fn min_db(&self) -> f64 {
        self.min_db
    }

    /// Highest acceptable level in dB.
    pub fn max_db(&self) -> f64 {
        self.max_db
    }

    /// True when `hz` lies inside the band.
    pub fn contains_frequency(&self, hz: f64) -> bool {
        (self.min_hz..=self.max_hz).contains(&hz)
    }

    /// True when `db` lies inside the level window.
    pub fn contains_level(&self, db: f64) -> bool {
        (self.min_db..=self.max_db).contains(&db)
    }

    /// Scan every channel of `spectrogram`, one report per channel.
    pub fn scan(&self, spectrogram: &Spectrogram) -> Vec<AlarmReport> {
        let watched: Vec<usize> = spectrogram
            .filter_frequencies()
            .iter()
            .enumerate()
            .filter(|(_, hz)| self.contains_frequency(**hz))
            .map(|(i, _)| i)
            .collect();

        (0..spectrogram.num_channels())
            .map(|channel| {
                let mut frames = Vec::new();
                let mut filters = BTreeSet::new();
                for (frame, spectrum) in spectrogram
                    .spectra(channel)
                    .unwrap_or_default()
                    .iter()
                    .enumerate()
                {
                    let mut hit = false;
                    for &filter in &watched {
                        if let Some(&db) = spectrum.get(filter)
                            && !self.contains_level(db)
                        {
                            filters.insert(filter);
                            hit = true;
                        }
                    }
                    if hit {
                        frames.push(frame);
                    }
                }

                let times = frames
                    .iter()
                    .filter_map(|&f| spectrogram.frame_to_time(f))
                    .collect();
                let filters: Vec<usize> = filters.into_iter().collect();
                let frequencies = filters
                    .iter()
                    .filter_map(|&f| spectrogram.filter_to_freq(f))
                    .collect();

                AlarmReport {
                    frames,
                    times,
                    filters,
                    frequencies,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleType;
    use espectro_core::{AudioFormat, ByteOrder};

    fn spectrogram() -> Spectrogram {
        let format = AudioFormat::signed(1000.0, 1, 16, ByteOrder::Little);
        let mut spec = Spectrogram::new(
            format,
            ScaleType::Linear,
            8,
            8,
            false,
            140.0,
            vec![0.0, 100.0, 200.0, 300.0],
        );
        spec.push_frame(0.008, vec![vec![0.0, -20.0, -20.0, 0.0]], None);
        spec.push_frame(0.016, vec![vec![0.0, -20.0, 5.0, 0.0]], None);
        spec.push_frame(0.024, vec![vec![0.0, -90.0, -20.0, 0.0]], None);
        spec
    }

    #[test]
    fn reports_frames_and_filters_inside_band() {
        let range = NormalRange::new(50.0, 250.0, -60.0, 0.0).unwrap();
        let reports = range.scan(&spectrogram());
        assert_eq!(reports.len(), 1);

        let report = &reports[0];
        assert_eq!(report.frames, vec![1, 2]);
        assert_eq!(report.times, vec![0.016, 0.024]);
        assert_eq!(report.filters, vec![1, 2]);
        assert_eq!(report.frequencies, vec![100.0, 200.0]);
    }

    #[test]
    fn ignores_filters_outside_band() {
        let range = NormalRange::new(250.0, 400.0, -1.0, 1.0).unwrap();
        assert!(range.scan(&spectrogram())[0].is_clear());
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(NormalRange::new(500.0, 100.0, -60.0, 0.0).is_err());
        assert!(NormalRange::new(100.0, 500.0, 0.0, -60.0).is_err());
    }
}
