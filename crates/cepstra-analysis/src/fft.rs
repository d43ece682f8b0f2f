//! FFT wrapper for real-valued frames

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// Forward FFT processor holding one plan
///
/// Only the plan is kept (not the planner), so the processor is `Send` and
/// can live inside a graph node.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
    buffer: Vec<Complex<f32>>,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(size);

        Self {
            fft,
            size,
            buffer: Vec::with_capacity(size),
        }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of bins [`magnitude`](Self::magnitude) returns (DC to Nyquist).
    pub fn bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Resize the FFT (creates new plan if needed)
    pub fn resize(&mut self, size: usize) {
        if size != self.size {
            self.fft = FftPlanner::new().plan_fft_forward(size);
            self.size = size;
        }
    }

    /// Perform forward FFT on real input
    ///
    /// Input is zero-padded or truncated to the FFT size. Returns the complex
    /// spectrum (size/2 + 1 bins for positive frequencies).
    pub fn forward(&mut self, input: &[f32]) -> Vec<Complex<f32>> {
        self.transform(input);
        self.buffer[..self.bins()].to_vec()
    }

    /// Magnitude spectrum `|X[k]|` of real input, size/2 + 1 bins.
    pub fn magnitude(&mut self, input: &[f32]) -> Vec<f32> {
        self.transform(input);
        let bins = self.bins();
        self.buffer[..bins].iter().map(|c| c.norm()).collect()
    }

    fn transform(&mut self, input: &[f32]) {
        self.buffer.clear();
        self.buffer
            .extend(input.iter().take(self.size).map(|&x| Complex::new(x, 0.0)));

        // Pad to FFT size
        self.buffer.resize(self.size, Complex::new(0.0, 0.0));

        if self.size > 0 {
            self.fft.process(&mut self.buffer);
        }
    }
}

/// Compute magnitude spectrum in dB
pub fn magnitude_db(spectrum: &[f32]) -> Vec<f32> {
    spectrum
        .iter()
        .map(|&mag| 20.0 * mag.max(1e-10).log10())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_dc_detection() {
        let mut fft = Fft::new(256);

        // DC signal
        let input = vec![1.0; 256];
        let spectrum = fft.magnitude(&input);

        // DC bin holds everything
        assert_eq!(spectrum.len(), 129);
        assert!((spectrum[0] - 256.0).abs() < 1e-3);
        let other: f32 = spectrum[1..].iter().sum();
        assert!(other < 1e-2);
    }

    #[test]
    fn test_sine_peak_bin() {
        let mut fft = Fft::new(1024);
        let input: Vec<f32> = (0..1024)
            .map(|i| (2.0 * PI * 32.0 * i as f32 / 1024.0).sin())
            .collect();

        let spectrum = fft.magnitude(&input);
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(32));
        // Full-scale sine: |X| = N/2 at the tone bin
        assert!((spectrum[32] - 512.0).abs() < 0.5);
    }

    #[test]
    fn test_short_input_is_zero_padded() {
        let mut fft = Fft::new(8);
        let spectrum = fft.forward(&[1.0]);
        assert_eq!(spectrum.len(), 5);
        for c in spectrum {
            assert!((c.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_resize() {
        let mut fft = Fft::new(8);
        fft.resize(16);
        assert_eq!(fft.size(), 16);
        assert_eq!(fft.magnitude(&[0.0; 16]).len(), 9);
    }

    #[test]
    fn test_magnitude_db_floor() {
        assert_eq!(magnitude_db(&[0.0, 1.0]), [-200.0, 0.0]);
    }
}
