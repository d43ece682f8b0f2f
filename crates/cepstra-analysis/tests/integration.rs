//! Integration tests for cepstra-analysis crate.
//!
//! Exercise the frame-to-descriptor path (segmentation, windowing, spectrum,
//! MFCC, roll-off, RMS, ZCR) on synthetic signals with known properties.

use std::f32::consts::PI;

use cepstra_analysis::{
    FrameSlicer, Mfcc, MfccConfig, NoiseGenerator, SilencePolicy, Window, frame_count, frames,
    is_silent, magnitude_spectrum, rms, spectral_rolloff, zero_crossing_rate,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a sine wave at a given frequency and amplitude.
fn sine(freq_hz: f32, sample_rate: f32, num_samples: usize, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate).sin())
        .collect()
}

/// Index of the largest value.
fn peak_bin(spectrum: &[f32]) -> usize {
    spectrum
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap()
}

// ===========================================================================
// 1. Frame segmentation
// ===========================================================================

#[test]
fn frame_count_matches_reference_cases() {
    assert_eq!(frame_count(0, 2048, 1024), 0);
    assert_eq!(frame_count(1, 2048, 1024), 1);
    assert_eq!(frame_count(2048, 2048, 1024), 1);
    assert_eq!(frame_count(2049, 2048, 1024), 2);
    assert_eq!(frame_count(4096, 2048, 1024), 3);
    assert_eq!(frame_count(44100, 2048, 1024), 43);
    // Hop longer than the frame skips samples
    assert_eq!(frame_count(10, 2, 4), 3);
}

#[test]
fn frames_start_at_zero_and_pad_the_last() {
    let signal: Vec<f32> = (1..=5).map(|x| x as f32).collect();
    let out = frames(&signal, 4, 2);
    assert_eq!(out, [vec![1.0, 2.0, 3.0, 4.0], vec![3.0, 4.0, 5.0, 0.0]]);
}

#[test]
fn streaming_in_odd_chunks_matches_whole_signal() {
    let signal = sine(440.0, 44100.0, 10_000, 0.8);
    let expected = frames(&signal, 2048, 1024);

    let mut slicer = FrameSlicer::new(2048, 1024);
    let mut streamed = Vec::new();
    for chunk in signal.chunks(777) {
        slicer.push(chunk);
        streamed.extend(slicer.by_ref());
    }
    streamed.extend(slicer.finish());

    assert_eq!(streamed, expected);
}

#[test]
fn slicer_is_reusable_after_finish() {
    let mut slicer = FrameSlicer::new(4, 2);
    slicer.push(&[1.0; 6]);
    let mut first: Vec<_> = slicer.by_ref().collect();
    first.extend(slicer.finish());
    slicer.push(&[1.0; 6]);
    let mut second: Vec<_> = slicer.by_ref().collect();
    second.extend(slicer.finish());
    assert_eq!(first, second);
}

// ===========================================================================
// 2. Silence handling
// ===========================================================================

#[test]
fn silent_frame_detection() {
    assert!(is_silent(&[0.0; 2048], -100.0));
    assert!(!is_silent(&sine(1000.0, 44100.0, 2048, 1e-3), -100.0));
    assert_eq!("noise".parse::<SilencePolicy>(), Ok(SilencePolicy::Noise));
    assert_eq!(SilencePolicy::default(), SilencePolicy::Noise);
}

#[test]
fn noise_fill_stays_at_silence_level() {
    let mut frame = vec![0.0; 2048];
    NoiseGenerator::default().add_to(&mut frame);
    assert!(frame.iter().any(|&x| x != 0.0));
    assert!(frame.iter().all(|x| x.abs() <= 1.01e-5));
}

// ===========================================================================
// 3. Spectral descriptors
// ===========================================================================

#[test]
fn tone_peaks_at_its_bin() {
    let sr = 44100.0;
    // Bin-centred tone: bin 93 of a 2048-point FFT
    let freq = 93.0 * sr / 2048.0;
    let spectrum = magnitude_spectrum(&sine(freq, sr, 2048, 1.0), Window::BlackmanHarris62);
    assert_eq!(spectrum.len(), 1025);
    assert_eq!(peak_bin(&spectrum), 93);
}

#[test]
fn rolloff_of_tone_sits_near_tone() {
    let sr = 44100.0;
    let spectrum = magnitude_spectrum(&sine(3000.0, sr, 2048, 0.5), Window::BlackmanHarris62);
    let rolloff = spectral_rolloff(&spectrum, sr, 0.85);
    assert!((rolloff - 3000.0).abs() < 100.0, "rolloff {rolloff}");
}

#[test]
fn spectral_rms_scales_with_amplitude() {
    let sr = 44100.0;
    let loud = rms(&magnitude_spectrum(&sine(1000.0, sr, 2048, 1.0), Window::Hann));
    let quiet = rms(&magnitude_spectrum(&sine(1000.0, sr, 2048, 0.5), Window::Hann));
    assert!((loud / quiet - 2.0).abs() < 1e-3);
}

#[test]
fn zcr_of_tone_tracks_frequency() {
    // 1 kHz at 44.1 kHz crosses zero ~2000 times per second
    let frame = sine(1000.0, 44100.0, 2048, 1.0);
    let zcr = zero_crossing_rate(&frame, 0.0);
    let expected = 2.0 * 1000.0 / 44100.0;
    assert!((zcr - expected).abs() < 2e-3, "zcr {zcr}");
}

// ===========================================================================
// 4. MFCC
// ===========================================================================

#[test]
fn mfcc_of_tone_is_finite_and_shaped() {
    let sr = 44100.0;
    let mfcc = Mfcc::new(MfccConfig::default(), 1025).unwrap();
    for frame in frames(&sine(440.0, sr, 8192, 0.5), 2048, 1024) {
        let spectrum = magnitude_spectrum(&frame, Window::BlackmanHarris62);
        let out = mfcc.compute(&spectrum).unwrap();
        assert_eq!(out.bands.len(), 40);
        assert_eq!(out.mfcc.len(), 13);
        assert!(out.mfcc.iter().all(|c| c.is_finite()));
    }
}

#[test]
fn mfcc_energy_lands_in_tone_band() {
    let sr = 44100.0;
    let mfcc = Mfcc::new(MfccConfig::default(), 1025).unwrap();
    let spectrum = magnitude_spectrum(&sine(1000.0, sr, 2048, 1.0), Window::BlackmanHarris62);
    let out = mfcc.compute(&spectrum).unwrap();

    // Band centred closest to 1 kHz dominates
    let loudest = peak_bin(&out.bands);
    let mel_step = cepstra_analysis::hz_to_mel(11000.0) / 41.0;
    let centre = cepstra_analysis::mel_to_hz(mel_step * (loudest + 1) as f32);
    assert!((centre - 1000.0).abs() < 250.0, "band {loudest} centred at {centre}");
}

#[test]
fn louder_signal_raises_c0() {
    let sr = 44100.0;
    let mfcc = Mfcc::new(MfccConfig::default(), 1025).unwrap();
    let c0 = |amp: f32| {
        let spectrum = magnitude_spectrum(&sine(500.0, sr, 2048, amp), Window::BlackmanHarris62);
        mfcc.compute(&spectrum).unwrap().mfcc[0]
    };
    assert!(c0(1.0) > c0(0.1));
}

// ===========================================================================
// 5. Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn frames_len_matches_frame_count(
        len in 0usize..5000,
        frame in 1usize..600,
        hop in 1usize..600,
    ) {
        let signal = vec![0.25; len];
        let out = frames(&signal, frame, hop);
        prop_assert_eq!(out.len(), frame_count(len, frame, hop));
        prop_assert!(out.iter().all(|f| f.len() == frame));
    }

    #[test]
    fn zcr_is_a_rate(samples in prop::collection::vec(-1.0f32..1.0, 1..512)) {
        let zcr = zero_crossing_rate(&samples, 0.0);
        prop_assert!((0.0..1.0).contains(&zcr));
    }
}
