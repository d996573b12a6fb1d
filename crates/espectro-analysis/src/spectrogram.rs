//! Frequency-time matrix produced by the streaming analyzer
//!
//! A [`Spectrogram`] holds, per analysed channel, one scaled decibel vector
//! per frame plus (optionally) the raw frame samples, together with a shared
//! timestamp sequence. It is append-only while a run is in progress.

use espectro_core::AudioFormat;

use crate::level;
use crate::scale::ScaleType;

/// Per-channel time series.
#[derive(Debug, Clone, Default)]
struct ChannelSeries {
    spectra: Vec<Vec<f64>>,
    samples: Vec<Vec<f64>>,
}

/// Spectrogram data structure
#[derive(Debug, Clone)]
pub struct Spectrogram {
    format: AudioFormat,
    scale: ScaleType,
    fft_size: usize,
    hop_size: usize,
    merged: bool,
    range_db: f64,
    centers: Vec<f64>,
    timestamps: Vec<f64>,
    channels: Vec<ChannelSeries>,
}

impl Spectrogram {
    pub(crate) fn new(
        format: AudioFormat,
        scale: ScaleType,
        fft_size: usize,
        hop_size: usize,
        merged: bool,
        range_db: f64,
        centers: Vec<f64>,
    ) -> Self {
        let channels = if merged { 1 } else { format.channels() };
        Self {
            format,
            scale,
            fft_size,
            hop_size,
            merged,
            range_db,
            centers,
            timestamps: Vec::new(),
            channels: vec![ChannelSeries::default(); channels],
        }
    }

    /// Append one frame. `spectra` and `samples` are indexed by channel.
    pub(crate) fn push_frame(
        &mut self,
        timestamp: f64,
        spectra: Vec<Vec<f64>>,
        samples: Option<Vec<Vec<f64>>>,
    ) {
        debug_assert_eq!(spectra.len(), self.channels.len());
        self.timestamps.push(timestamp);
        for (series, spectrum) in self.channels.iter_mut().zip(spectra) {
            series.spectra.push(spectrum);
        }
        if let Some(samples) = samples {
            for (series, frame) in self.channels.iter_mut().zip(samples) {
                series.samples.push(frame);
            }
        }
    }

    /// Format of the analysed stream.
    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.format.sample_rate()
    }

    /// Frequency scale of the filter axis.
    pub fn scale(&self) -> ScaleType {
        self.scale
    }

    /// FFT size used
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Hop size between frames
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// True when all source channels were averaged into one.
    pub fn is_merged(&self) -> bool {
        self.merged
    }

    /// Dynamic range in dB used for display mapping.
    pub fn range_db(&self) -> f64 {
        self.range_db
    }

    /// Number of analysed channels (1 when merged).
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of time frames
    pub fn num_frames(&self) -> usize {
        self.timestamps.len()
    }

    /// Number of filters per spectrum.
    pub fn num_filters(&self) -> usize {
        self.centers.len()
    }

    /// True when no frame has been produced.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Elapsed stream time in seconds at the end of each frame.
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Get time in seconds for a given frame index
    pub fn frame_to_time(&self, frame: usize) -> Option<f64> {
        self.timestamps.get(frame).copied()
    }

    /// Get duration in seconds
    pub fn duration(&self) -> f64 {
        self.timestamps.last().copied().unwrap_or(0.0)
    }

    /// Centre frequency in Hz of each filter.
    pub fn filter_frequencies(&self) -> &[f64] {
        &self.centers
    }

    /// Centre frequency in Hz of one filter.
    pub fn filter_to_freq(&self, filter: usize) -> Option<f64> {
        self.centers.get(filter).copied()
    }

    /// Map Hz onto the filter axis scale.
    pub fn hz_to_scale(&self, hz: f64) -> f64 {
        self.scale.forward(hz)
    }

    /// Map a scale value back to Hz.
    pub fn scale_to_hz(&self, value: f64) -> f64 {
        self.scale.inverse(value)
    }

    /// All scaled decibel spectra of one channel.
    pub fn spectra(&self, channel: usize) -> Option<&[Vec<f64>]> {
        self.channels.get(channel).map(|c| c.spectra.as_slice())
    }

    /// Get the spectrum for a specific channel and time frame
    pub fn frame(&self, channel: usize, frame: usize) -> Option<&[f64]> {
        self.channels
            .get(channel)?
            .spectra
            .get(frame)
            .map(Vec::as_slice)
    }

    /// Level in dB at a channel, frame and filter.
    pub fn get(&self, channel: usize, frame: usize, filter: usize) -> Option<f64> {
        self.frame(channel, frame)?.get(filter).copied()
    }

    /// One frame mapped onto `[0, 1]` through the dynamic range.
    pub fn normalized_frame(&self, channel: usize, frame: usize) -> Option<Vec<f64>> {
        let range = self.range_db;
        Some(
            self.frame(channel, frame)?
                .iter()
                .map(|&db| level::normalized_level(db, range))
                .collect(),
        )
    }

    /// Levels of one filter across time.
    pub fn filter_over_time(&self, channel: usize, filter: usize) -> Vec<f64> {
        self.spectra(channel)
            .unwrap_or_default()
            .iter()
            .filter_map(|frame| frame.get(filter).copied())
            .collect()
    }

    /// Raw time-domain frames of one channel, if samples were retained.
    pub fn samples(&self, channel: usize) -> Option<&[Vec<f64>]> {
        self.channels.get(channel).map(|c| c.samples.as_slice())
    }

    /// Strongest filter and its level at a given frame.
    pub fn peak_filter(&self, channel: usize, frame: usize) -> Option<(usize, f64)> {
        self.frame(channel, frame)?
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Linear RMS of each retained frame of one channel.
    pub fn rms_levels(&self, channel: usize) -> Vec<f64> {
        self.samples(channel)
            .unwrap_or_default()
            .iter()
            .map(|frame| level::rms(frame))
            .collect()
    }

    /// RMS level in dB of each retained frame of one channel.
    pub fn rms_db_levels(&self, channel: usize, gain: f64) -> Vec<f64> {
        self.rms_levels(channel)
            .into_iter()
            .map(|rms| level::amplitude_to_db(rms, gain))
            .collect()
    }
}
