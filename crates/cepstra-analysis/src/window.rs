//! Window functions
//!
//! All shapes use the symmetric form, `cos(2πi / (N - 1))`, so the first and
//! last coefficients mirror each other.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Window {
    /// Hann window (raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
    /// 3-term Blackman-Harris window, -62 dB sidelobes
    BlackmanHarris62,
    /// 4-term Blackman-Harris window, -92 dB sidelobes
    BlackmanHarris92,
    /// Rectangular (no tapering)
    Square,
}

impl Window {
    /// All window types, in declaration order.
    pub const ALL: [Window; 6] = [
        Window::Hann,
        Window::Hamming,
        Window::Blackman,
        Window::BlackmanHarris62,
        Window::BlackmanHarris92,
        Window::Square,
    ];

    /// Parameter names accepted by [`FromStr`], matching [`Window::ALL`].
    pub const NAMES: &'static [&'static str] = &[
        "hann",
        "hamming",
        "blackman",
        "blackmanharris62",
        "blackmanharris92",
        "square",
    ];

    /// Stable parameter name.
    pub const fn name(self) -> &'static str {
        match self {
            Window::Hann => "hann",
            Window::Hamming => "hamming",
            Window::Blackman => "blackman",
            Window::BlackmanHarris62 => "blackmanharris62",
            Window::BlackmanHarris92 => "blackmanharris92",
            Window::Square => "square",
        }
    }

    /// Cosine-sum coefficients `a0 - a1 cos x + a2 cos 2x - a3 cos 3x`.
    fn cosine_terms(self) -> [f32; 4] {
        match self {
            Window::Hann => [0.5, 0.5, 0.0, 0.0],
            Window::Hamming => [0.53836, 0.46164, 0.0, 0.0],
            Window::Blackman => [0.42, 0.5, 0.08, 0.0],
            Window::BlackmanHarris62 => [0.44959, 0.49364, 0.05677, 0.0],
            Window::BlackmanHarris92 => [0.35875, 0.48829, 0.14128, 0.01168],
            Window::Square => [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// Get window coefficients
    ///
    /// With `normalized` set, coefficients are scaled so they sum to 2, which
    /// keeps the magnitude of a full-scale sinusoid near 1 after the FFT.
    pub fn coefficients(self, size: usize, normalized: bool) -> Vec<f32> {
        let [a0, a1, a2, a3] = self.cosine_terms();
        let denom = size.saturating_sub(1).max(1) as f32;

        let mut coeffs: Vec<f32> = (0..size)
            .map(|i| {
                if size == 1 {
                    return 1.0;
                }
                let x = 2.0 * PI * i as f32 / denom;
                a0 - a1 * x.cos() + a2 * (2.0 * x).cos() - a3 * (3.0 * x).cos()
            })
            .collect();

        if normalized {
            let sum: f32 = coeffs.iter().sum();
            if sum > 0.0 {
                let scale = 2.0 / sum;
                coeffs.iter_mut().for_each(|c| *c *= scale);
            }
        }
        coeffs
    }

    /// Apply window to a buffer
    pub fn apply(self, buffer: &mut [f32], normalized: bool) {
        let coeffs = self.coefficients(buffer.len(), normalized);
        for (sample, w) in buffer.iter_mut().zip(coeffs) {
            *sample *= w;
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Window {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Window::ALL
            .into_iter()
            .find(|w| w.name() == s)
            .ok_or_else(|| AnalysisError::UnknownWindow(s.to_string()))
    }
}

/// Rotates `frame` so its centre sample lands at index 0.
///
/// Leaves the magnitude spectrum unchanged and removes the linear phase term
/// a centred window would otherwise add.
pub fn zero_phase(frame: &mut [f32]) {
    let half = frame.len() / 2;
    frame.rotate_left(half);
}
