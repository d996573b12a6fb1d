//! Streaming spectrogram analyzer
//!
//! [`StreamingAnalyzer`] pulls PCM bytes from any [`Read`] source one hop at
//! a time, keeps a resident interleaved frame of `frame_size` samples per
//! channel, and appends one scaled decibel spectrum per channel to its
//! [`Spectrogram`] for every step.
//!
//! ```text
//! read hop ─► decode ─► shift resident frame ─► merge / split channels
//!                                                   │
//!         spectrogram ◄─ dB ◄─ filter bank ◄─ FFT ◄─┘
//! ```
//!
//! Consecutive frames share `overlap` samples: sample `k` of frame `t + 1`
//! equals sample `k + hop` of frame `t` for every `k < overlap`.

use std::io::Read;

use espectro_core::{AudioFormat, PaddingPolicy, PcmConvert, SampleCodec};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{AnalysisError, Result};
use crate::fft::SpectralTransform;
use crate::filterbank::ScaleFilterBank;
use crate::level;
use crate::scale::ScaleType;
use crate::source::{CancellationToken, read_full};
use crate::spectrogram::Spectrogram;
use crate::window::WindowFunction;

/// What to do with a final read shorter than one hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Discard the partial hop.
    #[default]
    Drop,
    /// Zero-pad the partial hop into one last frame.
    Pad,
}

/// Analyzer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerSettings {
    /// FFT size `N`, a power of two.
    pub frame_size: usize,
    /// Samples shared between consecutive frames, `0 <= overlap < frame_size`.
    pub overlap: usize,
    /// Average all channels into one before analysis.
    pub merge_channels: bool,
    /// Frequency scale of the filter bank.
    pub scale: ScaleType,
    /// Filter count; `None` means `frame_size / 2`.
    pub num_filters: Option<usize>,
    /// Tapering window.
    pub window: WindowFunction,
    /// Offset added to every decibel value.
    pub gain_db: f64,
    /// Dynamic range handed to consumers for level mapping.
    pub range_db: f64,
    /// Handling of a short final read.
    pub tail: TailPolicy,
    /// Keep raw frame samples alongside the spectra.
    pub retain_samples: bool,
    /// Padding placement for integer depths above 32 bits.
    pub padding: PaddingPolicy,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            frame_size: 512,
            overlap: 0,
            merge_channels: true,
            scale: ScaleType::Mel,
            num_filters: None,
            window: WindowFunction::Hann,
            gain_db: 0.0,
            range_db: 140.0,
            tail: TailPolicy::Drop,
            retain_samples: true,
            padding: PaddingPolicy::LeastSignificant,
        }
    }
}

impl AnalyzerSettings {
    /// New samples consumed per step, `frame_size - overlap`.
    pub fn hop_size(&self) -> usize {
        self.frame_size.saturating_sub(self.overlap)
    }

    /// Effective filter count.
    pub fn filter_count(&self) -> usize {
        self.num_filters.unwrap_or(self.frame_size / 2)
    }

    /// Check every setting before any frame is processed.
    pub fn validate(&self) -> Result<()> {
        if self.frame_size < 2 || !self.frame_size.is_power_of_two() {
            return Err(AnalysisError::invalid_configuration(format!(
                "frame size must be a power of two >= 2, got {}",
                self.frame_size
            )));
        }
        if self.overlap >= self.frame_size {
            return Err(AnalysisError::invalid_configuration(format!(
                "overlap {} must be less than frame size {}",
                self.overlap, self.frame_size
            )));
        }
        if self.filter_count() == 0 {
            return Err(AnalysisError::invalid_configuration(
                "filter count must be at least 1",
            ));
        }
        if !self.gain_db.is_finite() {
            return Err(AnalysisError::invalid_configuration("gain must be finite"));
        }
        if !self.range_db.is_finite() || self.range_db < 0.0 {
            return Err(AnalysisError::invalid_configuration(format!(
                "dynamic range must be a non-negative number of dB, got {}",
                self.range_db
            )));
        }
        Ok(())
    }
}

/// Overlap that yields roughly `target_frames` frames over `total_frames`.
///
/// Clamped to `[0, frame_size - 1]`.
pub fn overlap_for_target_frames(frame_size: usize, total_frames: u64, target_frames: usize) -> usize {
    if frame_size == 0 || target_frames == 0 {
        return 0;
    }
    let hop = total_frames as f64 / target_frames as f64;
    let overlap = (frame_size as f64 - hop).round().max(0.0) as usize;
    overlap.min(frame_size - 1)
}

/// Result of one pull step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A frame was appended to the spectrogram.
    Frame,
    /// The source is exhausted; no frame was appended.
    Finished,
}

/// How a cancellable run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The source was exhausted.
    Completed,
    /// The token was cancelled between steps.
    Cancelled,
}

/// Pull-based analyzer over one PCM stream.
#[derive(Debug)]
pub struct StreamingAnalyzer {
    format: AudioFormat,
    settings: AnalyzerSettings,
    codec: SampleCodec,
    transform: SpectralTransform,
    filter_bank: ScaleFilterBank,
    read_buf: Vec<u8>,
    decoded: Vec<f64>,
    /// Interleaved `frame_size * channels` samples.
    resident: Vec<f64>,
    frames_read: u64,
    finished: bool,
    spectrogram: Spectrogram,
}

impl StreamingAnalyzer {
    /// Build the full pipeline for `format`, failing fast on any bad setting.
    pub fn new(format: AudioFormat, settings: AnalyzerSettings) -> Result<Self> {
        settings.validate()?;
        let codec = SampleCodec::with_padding(&format, settings.padding)?;
        let transform = SpectralTransform::new(settings.frame_size, settings.window)?;
        let filter_bank = ScaleFilterBank::new(
            settings.scale,
            settings.filter_count(),
            format.sample_rate(),
            settings.frame_size,
        )?;

        let channels = format.channels();
        let hop = settings.hop_size();
        let spectrogram = Spectrogram::new(
            format,
            settings.scale,
            settings.frame_size,
            hop,
            settings.merge_channels,
            settings.range_db,
            filter_bank.centers().to_vec(),
        );

        tracing::debug!(
            frame_size = settings.frame_size,
            overlap = settings.overlap,
            filters = settings.filter_count(),
            scale = %settings.scale,
            window = %settings.window,
            merge = settings.merge_channels,
            "analyzer configured"
        );

        Ok(Self {
            read_buf: vec![0; hop * format.frame_size()],
            decoded: vec![0.0; hop * channels],
            resident: vec![0.0; settings.frame_size * channels],
            format,
            settings,
            codec,
            transform,
            filter_bank,
            frames_read: 0,
            finished: false,
            spectrogram,
        })
    }

    /// Format of the analysed stream.
    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    /// Active settings.
    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// The transform applied to every frame.
    pub fn transform(&self) -> &SpectralTransform {
        &self.transform
    }

    /// The filter bank applied to every spectrum.
    pub fn filter_bank(&self) -> &ScaleFilterBank {
        &self.filter_bank
    }

    /// Results accumulated so far.
    pub fn spectrogram(&self) -> &Spectrogram {
        &self.spectrogram
    }

    /// Consume the analyzer, keeping its results.
    pub fn into_spectrogram(self) -> Spectrogram {
        self.spectrogram
    }

    /// Multi-channel frames consumed from the source.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// True once the source is exhausted or has failed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Map Hz onto the configured scale.
    pub fn hz_to_scale(&self, hz: f64) -> f64 {
        self.filter_bank.hz_to_scale(hz)
    }

    /// Map a scale value back to Hz.
    pub fn scale_to_hz(&self, value: f64) -> f64 {
        self.filter_bank.scale_to_hz(value)
    }

    /// Pull one hop from `source` and append one frame.
    ///
    /// A source error ends the run with [`AnalysisError::SourceRead`]; frames
    /// appended before it stay in [`spectrogram`](Self::spectrogram).
    pub fn step<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<StepOutcome> {
        if self.finished {
            return Ok(StepOutcome::Finished);
        }

        let frame_bytes = self.format.frame_size();
        let channels = self.format.channels();
        let hop = self.settings.hop_size();

        let got = match read_full(source, &mut self.read_buf) {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                tracing::warn!(
                    error = %e,
                    frames = self.spectrogram.num_frames(),
                    "PCM source failed, keeping partial results"
                );
                return Err(AnalysisError::SourceRead(e));
            }
        };

        let whole = got / frame_bytes;
        if got < self.read_buf.len() {
            self.finished = true;
            if whole == 0 || self.settings.tail == TailPolicy::Drop {
                if got > 0 {
                    tracing::debug!(bytes = got, "discarding partial tail");
                }
                return Ok(StepOutcome::Finished);
            }
            tracing::debug!(
                frames = whole,
                padded = hop - whole,
                "zero-padding final frame"
            );
        }

        let count = whole * channels;
        self.codec
            .decode(&self.read_buf, 0, &mut self.decoded, 0, count)?;
        self.decoded[count..].fill(0.0);

        let shift = hop * channels;
        self.resident.copy_within(shift.., 0);
        let keep = self.resident.len() - shift;
        self.resident[keep..].copy_from_slice(&self.decoded);

        self.frames_read += whole as u64;
        let timestamp = self.frames_read as f64 / self.format.sample_rate();

        let frames = self.channel_frames();
        let spectra = self.analyze(&frames)?;
        let samples = self.settings.retain_samples.then_some(frames);
        self.spectrogram.push_frame(timestamp, spectra, samples);

        tracing::trace!(
            frame = self.spectrogram.num_frames() - 1,
            timestamp,
            "frame analysed"
        );
        Ok(StepOutcome::Frame)
    }

    /// Run until the source is exhausted.
    pub fn run<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<()> {
        self.log_start();
        while self.step(source)? == StepOutcome::Frame {}
        self.log_finish("completed");
        Ok(())
    }

    /// Run until the source is exhausted or `token` is cancelled.
    ///
    /// The token is checked before every step, so cancellation never leaves
    /// a half-appended frame behind.
    pub fn run_until_cancelled<R: Read + ?Sized>(
        &mut self,
        source: &mut R,
        token: &CancellationToken,
    ) -> Result<RunOutcome> {
        self.log_start();
        loop {
            if token.is_cancelled() {
                self.log_finish("cancelled");
                return Ok(RunOutcome::Cancelled);
            }
            if self.step(source)? == StepOutcome::Finished {
                self.log_finish("completed");
                return Ok(RunOutcome::Completed);
            }
        }
    }

    /// Merge or split the resident interleaved frame into per-channel frames.
    fn channel_frames(&self) -> Vec<Vec<f64>> {
        let channels = self.format.channels();
        if self.settings.merge_channels {
            let scale = 1.0 / channels as f64;
            vec![
                self.resident
                    .chunks_exact(channels)
                    .map(|group| group.iter().sum::<f64>() * scale)
                    .collect(),
            ]
        } else {
            (0..channels)
                .map(|c| {
                    self.resident
                        .iter()
                        .skip(c)
                        .step_by(channels)
                        .copied()
                        .collect()
                })
                .collect()
        }
    }

    /// Scaled decibel spectrum of each channel frame, in channel order.
    #[cfg(not(feature = "parallel"))]
    fn analyze(&self, frames: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let (transform, bank, gain) = (&self.transform, &self.filter_bank, self.settings.gain_db);
        frames
            .iter()
            .map(|frame| scaled_db(transform, bank, gain, frame))
            .collect()
    }

    /// Scaled decibel spectrum of each channel frame, in channel order.
    ///
    /// Channels are transformed on the rayon pool; the indexed collect keeps
    /// channel order.
    #[cfg(feature = "parallel")]
    fn analyze(&self, frames: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let (transform, bank, gain) = (&self.transform, &self.filter_bank, self.settings.gain_db);
        frames
            .par_iter()
            .map(|frame| scaled_db(transform, bank, gain, frame))
            .collect()
    }

    fn log_start(&self) {
        tracing::info!(
            sample_rate = self.format.sample_rate(),
            channels = self.format.channels(),
            bits = self.format.bits_per_sample(),
            encoding = %self.format.encoding(),
            frame_size = self.settings.frame_size,
            overlap = self.settings.overlap,
            "analysis started"
        );
    }

    fn log_finish(&self, outcome: &str) {
        tracing::info!(
            outcome,
            frames = self.spectrogram.num_frames(),
            duration_secs = self.spectrogram.duration(),
            "analysis finished"
        );
    }
}

fn scaled_db(
    transform: &SpectralTransform,
    filter_bank: &ScaleFilterBank,
    gain: f64,
    frame: &[f64],
) -> Result<Vec<f64>> {
    let magnitudes = transform.magnitudes(frame)?;
    let mut scaled = filter_bank.apply(&magnitudes)?;
    for value in &mut scaled {
        *value = level::amplitude_to_db(*value, gain);
    }
    Ok(scaled)
}
