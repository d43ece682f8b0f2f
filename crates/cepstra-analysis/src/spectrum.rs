//! Spectral descriptors over magnitude spectra
//!
//! A magnitude spectrum here is the `N/2 + 1` bins from DC to Nyquist of an
//! `N`-point FFT, as returned by [`Fft::magnitude`](crate::fft::Fft::magnitude).

use crate::fft::Fft;
use crate::window::{Window, zero_phase};

/// Compute magnitude spectrum of one frame
///
/// Windows `frame` (normalized, zero-phase) and returns `|FFT|` with
/// `frame.len() / 2 + 1` bins.
pub fn magnitude_spectrum(frame: &[f32], window: Window) -> Vec<f32> {
    let mut windowed = frame.to_vec();
    window.apply(&mut windowed, true);
    zero_phase(&mut windowed);
    Fft::new(frame.len()).magnitude(&windowed)
}

/// Frequency (Hz) of bin `bin` in a spectrum of `bins` bins.
pub fn bin_frequency(bin: usize, bins: usize, sample_rate: f32) -> f32 {
    if bins < 2 {
        return 0.0;
    }
    bin as f32 * (sample_rate / 2.0) / (bins - 1) as f32
}

/// Compute spectral rolloff (frequency below which `cutoff` of the energy is
/// contained)
///
/// Energy is the sum of squared magnitudes. Returns the frequency of the first
/// bin at which the cumulative energy reaches `cutoff * total`, and 0 for an
/// empty or all-zero spectrum.
pub fn spectral_rolloff(spectrum: &[f32], sample_rate: f32, cutoff: f32) -> f32 {
    let total_energy: f32 = spectrum.iter().map(|&m| m * m).sum();
    if total_energy <= 0.0 {
        return 0.0;
    }
    let threshold = total_energy * cutoff;

    let mut cumulative = 0.0;
    for (i, &mag) in spectrum.iter().enumerate() {
        cumulative += mag * mag;
        if cumulative >= threshold {
            return bin_frequency(i, spectrum.len(), sample_rate);
        }
    }

    sample_rate / 2.0 // Nyquist
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_bin_frequency() {
        // 2048-point FFT at 44.1 kHz
        assert_eq!(bin_frequency(0, 1025, 44100.0), 0.0);
        assert_eq!(bin_frequency(1024, 1025, 44100.0), 22050.0);
        assert!((bin_frequency(1, 1025, 44100.0) - 21.533_203).abs() < 1e-3);
    }

    #[test]
    fn test_rolloff_single_bin() {
        let mut spectrum = vec![0.0; 513];
        spectrum[100] = 1.0;
        let expected = bin_frequency(100, 513, 44100.0);
        assert_eq!(spectral_rolloff(&spectrum, 44100.0, 0.85), expected);
    }

    #[test]
    fn test_rolloff_silence_is_zero() {
        assert_eq!(spectral_rolloff(&[0.0; 513], 44100.0, 0.85), 0.0);
        assert_eq!(spectral_rolloff(&[], 44100.0, 0.85), 0.0);
    }

    #[test]
    fn test_rolloff_white_spectrum() {
        // Flat spectrum: 85% of the energy lies below ~85% of Nyquist
        let spectrum = vec![1.0; 1025];
        let rolloff = spectral_rolloff(&spectrum, 44100.0, 0.85);
        assert!((rolloff - 0.85 * 22050.0).abs() < 50.0, "rolloff {rolloff}");
    }

    #[test]
    fn test_magnitude_spectrum_normalized_peak() {
        // Normalized window: a full-scale bin-centred sine peaks near 1
        let sr = 44100.0;
        let freq = 100.0 * sr / 2048.0;
        let spectrum = magnitude_spectrum(&tone(freq, sr, 2048), Window::Hann);
        assert_eq!(spectrum.len(), 1025);
        assert!((spectrum[100] - 1.0).abs() < 0.05, "peak {}", spectrum[100]);
    }
}
