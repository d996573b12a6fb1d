//! Analyse a synthetic two-tone stream and print the strongest filters.
//!
//! Run with: RUST_LOG=debug cargo run -p espectro-analysis --example analysis_demo

use std::f64::consts::PI;
use std::io::Cursor;

use espectro_analysis::{
    AnalysisError, AnalyzerSettings, NormalRange, ScaleType, StreamingAnalyzer, format_hz,
};
use espectro_core::{AudioFormat, ByteOrder, SampleCodec};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AnalysisError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let sample_rate = 44100.0;
    let format = AudioFormat::signed(sample_rate, 2, 24, ByteOrder::Little);

    // left: 440 Hz, right: 3 kHz rising to full scale
    let len = sample_rate as usize * 2;
    let samples: Vec<f64> = (0..len)
        .flat_map(|i| {
            let t = i as f64 / sample_rate;
            let left = 0.5 * (2.0 * PI * 440.0 * t).sin();
            let right = (i as f64 / len as f64) * (2.0 * PI * 3000.0 * t).sin();
            [left, right]
        })
        .collect();
    let pcm = SampleCodec::new(&format)?.encode_to_vec(&samples)?;

    let settings = AnalyzerSettings {
        frame_size: 2048,
        overlap: 1024,
        merge_channels: false,
        scale: ScaleType::Mel,
        num_filters: Some(128),
        ..Default::default()
    };
    let mut analyzer = StreamingAnalyzer::new(format, settings)?;
    analyzer.run(&mut Cursor::new(pcm))?;
    let spectrogram = analyzer.into_spectrogram();

    for channel in 0..spectrogram.num_channels() {
        let last = spectrogram.num_frames() - 1;
        if let Some((filter, db)) = spectrogram.peak_filter(channel, last) {
            let hz = spectrogram.filter_to_freq(filter).unwrap_or_default();
            println!(
                "channel {channel}: peak at {} ({db:.1} dB) after {:.2} s",
                format_hz(hz),
                spectrogram.duration()
            );
        }
    }

    let range = NormalRange::new(2500.0, 3500.0, -200.0, -12.0)?;
    for (channel, report) in range.scan(&spectrogram).iter().enumerate() {
        match report.times.first() {
            Some(t) => println!("channel {channel}: 2.5-3.5 kHz band too loud from {t:.2} s"),
            None => println!("channel {channel}: 2.5-3.5 kHz band within range"),
        }
    }

    Ok(())
}
