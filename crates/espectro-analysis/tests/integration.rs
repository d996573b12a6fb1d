//! Integration tests for espectro-analysis crate.
//!
//! Drives the streaming analyzer end to end over synthetic PCM streams
//! encoded with espectro-core, and checks the transform and filter bank
//! against signals with known spectra.

use std::f64::consts::PI;
use std::io::{self, Cursor, Read};

use espectro_analysis::{
    AnalysisError, AnalyzerSettings, CancellationToken, NormalRange, RunOutcome, ScaleFilterBank,
    ScaleType, SpectralTransform, StreamingAnalyzer, TailPolicy, WindowFunction,
};
use espectro_core::{AudioFormat, ByteOrder, SampleCodec};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a sine wave at a given frequency and amplitude.
fn sine(freq_hz: f64, sample_rate: f64, num_samples: usize, amplitude: f64) -> Vec<f64> {
    (0..num_samples)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
        .collect()
}

/// Interleave per-channel signals of equal length.
fn interleave(channels: &[Vec<f64>]) -> Vec<f64> {
    let len = channels[0].len();
    (0..len)
        .flat_map(|i| channels.iter().map(move |c| c[i]))
        .collect()
}

/// Encode samples as PCM bytes in `format`.
fn encode(format: &AudioFormat, samples: &[f64]) -> Vec<u8> {
    SampleCodec::new(format)
        .unwrap()
        .encode_to_vec(samples)
        .unwrap()
}

/// Yields `limit` bytes of `inner`, then fails.
struct FailingAfter<R> {
    inner: R,
    remaining: usize,
}

impl<R: Read> Read for FailingAfter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream lost"));
        }
        let n = buf.len().min(self.remaining);
        let n = self.inner.read(&mut buf[..n])?;
        self.remaining -= n;
        Ok(n)
    }
}

/// Cancels `token` once `trigger` bytes have been read.
struct CancelAfter<R> {
    inner: R,
    read: usize,
    trigger: usize,
    token: CancellationToken,
}

impl<R: Read> Read for CancelAfter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n;
        if self.read >= self.trigger {
            self.token.cancel();
        }
        Ok(n)
    }
}

// ===========================================================================
// 1. End-to-end stream scenarios
// ===========================================================================

#[test]
fn one_second_of_silence() {
    let format = AudioFormat::signed(44100.0, 1, 16, ByteOrder::Little);
    let settings = AnalyzerSettings {
        frame_size: 1024,
        overlap: 0,
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();
    analyzer.run(&mut Cursor::new(vec![0u8; 44100 * 2])).unwrap();

    let spec = analyzer.spectrogram();
    assert_eq!(spec.num_frames(), 44100 / 1024);
    assert_eq!(spec.num_frames(), 43);
    assert_eq!(spec.num_filters(), 512);

    for frame in spec.spectra(0).unwrap() {
        assert!(frame.iter().all(|&db| (db + 240.0).abs() < 1e-9));
    }
    for pair in spec.timestamps().windows(2) {
        assert!(pair[1] > pair[0]);
    }
    assert!((spec.timestamps()[0] - 1024.0 / 44100.0).abs() < 1e-12);
}

#[test]
fn sine_peak_lands_on_matching_filter() {
    let sample_rate = 8192.0;
    let frame_size = 256;
    // bin 20 centre: 20 * 8192 / 256 = 640 Hz
    let freq = 640.0;
    let format = AudioFormat::signed(sample_rate, 1, 24, ByteOrder::Big);
    let pcm = encode(&format, &sine(freq, sample_rate, frame_size * 4, 0.9));

    let settings = AnalyzerSettings {
        frame_size,
        scale: ScaleType::Linear,
        window: WindowFunction::Rectangular,
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();
    analyzer.run(&mut Cursor::new(pcm)).unwrap();

    let spec = analyzer.into_spectrogram();
    assert_eq!(spec.num_frames(), 4);
    for frame in 0..4 {
        let (filter, db) = spec.peak_filter(0, frame).unwrap();
        assert_eq!(filter, 20);
        assert!((spec.filter_to_freq(filter).unwrap() - freq).abs() < 1e-9);
        // 0.9 amplitude -> about -0.92 dB
        assert!((db - 20.0 * 0.9f64.log10()).abs() < 0.01, "peak {db} dB");
    }
}

#[test]
fn split_channels_keep_their_own_tones() {
    let sample_rate = 16000.0;
    let frame_size = 512;
    let format = AudioFormat::unsigned(sample_rate, 2, 8, ByteOrder::Little);
    let left = sine(500.0, sample_rate, frame_size * 3, 0.8);
    let right = sine(4000.0, sample_rate, frame_size * 3, 0.8);
    let pcm = encode(&format, &interleave(&[left, right]));

    let settings = AnalyzerSettings {
        frame_size,
        merge_channels: false,
        scale: ScaleType::Linear,
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();
    analyzer.run(&mut Cursor::new(pcm)).unwrap();

    let spec = analyzer.spectrogram();
    assert_eq!(spec.num_channels(), 2);
    let bin_hz = sample_rate / frame_size as f64;
    let (left_peak, _) = spec.peak_filter(0, 1).unwrap();
    let (right_peak, _) = spec.peak_filter(1, 1).unwrap();
    assert_eq!(left_peak, (500.0 / bin_hz) as usize);
    assert_eq!(right_peak, (4000.0 / bin_hz) as usize);
}

#[test]
fn overlap_yields_more_frames_with_shared_samples() {
    let format = AudioFormat::float(48000.0, 1, 32, ByteOrder::Little);
    let pcm = encode(&format, &sine(1000.0, 48000.0, 4096, 0.5));

    let settings = AnalyzerSettings {
        frame_size: 1024,
        overlap: 768,
        tail: TailPolicy::Drop,
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();
    analyzer.run(&mut Cursor::new(pcm)).unwrap();

    let spec = analyzer.spectrogram();
    assert_eq!(spec.hop_size(), 256);
    assert_eq!(spec.num_frames(), 16);

    let frames = spec.samples(0).unwrap();
    for pair in frames.windows(2) {
        for k in 0..768 {
            assert_eq!(pair[1][k], pair[0][k + 256]);
        }
    }
}

// ===========================================================================
// 2. Failure and cancellation
// ===========================================================================

#[test]
fn source_error_keeps_partial_results() {
    let format = AudioFormat::signed(8000.0, 1, 16, ByteOrder::Little);
    let settings = AnalyzerSettings {
        frame_size: 64,
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();

    // three full hops, then half a hop before the failure
    let mut source = FailingAfter {
        inner: Cursor::new(vec![0u8; 10_000]),
        remaining: 64 * 2 * 3 + 64,
    };
    let err = analyzer.run(&mut source).unwrap_err();
    assert!(matches!(err, AnalysisError::SourceRead(_)));

    assert!(analyzer.is_finished());
    assert_eq!(analyzer.spectrogram().num_frames(), 3);
    assert_eq!(analyzer.frames_read(), 192);
}

#[test]
fn cancellation_stops_between_steps() {
    let format = AudioFormat::signed(8000.0, 1, 16, ByteOrder::Little);
    let settings = AnalyzerSettings {
        frame_size: 128,
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();

    let token = CancellationToken::new();
    let mut source = CancelAfter {
        inner: Cursor::new(vec![0u8; 128 * 2 * 50]),
        read: 0,
        trigger: 128 * 2 * 5,
        token: token.clone(),
    };

    let outcome = analyzer.run_until_cancelled(&mut source, &token).unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(analyzer.spectrogram().num_frames(), 5);
    assert!(!analyzer.is_finished());
}

#[test]
fn uncancelled_run_completes() {
    let format = AudioFormat::signed(8000.0, 1, 16, ByteOrder::Little);
    let settings = AnalyzerSettings {
        frame_size: 128,
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();
    let token = CancellationToken::new();
    let outcome = analyzer
        .run_until_cancelled(&mut Cursor::new(vec![0u8; 128 * 2 * 7]), &token)
        .unwrap();
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(analyzer.spectrogram().num_frames(), 7);
}

// ===========================================================================
// 3. Transform and filter bank
// ===========================================================================

#[test]
fn transform_peak_matches_input_frequency() {
    let sample_rate = 48000.0;
    let size = 4096;
    let bin = 100;
    let freq = bin as f64 * sample_rate / size as f64;

    let fft = SpectralTransform::new(size, WindowFunction::Rectangular).unwrap();
    let mags = fft.magnitudes(&sine(freq, sample_rate, size, 1.0)).unwrap();
    let (peak, mag) = SpectralTransform::peak(&mags).unwrap();

    assert_eq!(peak, (freq * size as f64 / sample_rate).round() as usize);
    assert!((mag - 1.0).abs() < 1e-9);
    assert!((fft.bin_to_freq(peak, sample_rate) - freq).abs() < 1e-9);
}

#[test]
fn mel_bank_concentrates_low_frequencies() {
    let bank = ScaleFilterBank::new(ScaleType::Mel, 64, 44100.0, 2048).unwrap();
    let below_1k = bank.centers().iter().filter(|&&hz| hz < 1000.0).count();
    // mel(1000) / mel(22050) is about 0.26 of the axis
    assert!((14..=18).contains(&below_1k), "{below_1k} filters below 1 kHz");
}

#[test]
fn normal_range_flags_loud_tone() {
    let sample_rate = 8000.0;
    let format = AudioFormat::signed(sample_rate, 1, 16, ByteOrder::Little);
    let quiet = sine(1000.0, sample_rate, 1024, 0.001);
    let loud = sine(1000.0, sample_rate, 512, 0.9);
    let pcm = encode(&format, &[quiet, loud].concat());

    let settings = AnalyzerSettings {
        frame_size: 512,
        scale: ScaleType::Linear,
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings).unwrap();
    analyzer.run(&mut Cursor::new(pcm)).unwrap();
    let spec = analyzer.into_spectrogram();
    assert_eq!(spec.num_frames(), 3);

    let range = NormalRange::new(900.0, 1100.0, -300.0, -20.0).unwrap();
    let report = &range.scan(&spec)[0];
    assert_eq!(report.frames, vec![2]);
    assert!(report.frequencies.contains(&1000.0));
    assert_eq!(report.times, vec![1536.0 / sample_rate]);
}
