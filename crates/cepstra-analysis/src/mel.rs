//! Mel filterbank and MFCC
//!
//! The MFCC pipeline per frame:
//!
//! 1. Square the magnitude spectrum (power spectrum).
//! 2. Apply a triangular mel filterbank; each filter's weights sum to 1.
//!    These are the mel *bands*.
//! 3. Convert each band to dB: `20 * log10(max(band, 1e-10))`.
//! 4. Orthonormal DCT-II, keeping the first coefficients.
//!
//! Mel conversion uses the HTK formula `2595 * log10(1 + hz / 700)`.

use std::f32::consts::PI;

use crate::error::AnalysisError;
use crate::spectrum::bin_frequency;

/// Floor applied to band energies before the log.
pub const LOG_FLOOR: f32 = 1e-10;

/// Convert Hz to Mel scale
pub fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert Mel to Hz
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Mel filterbank for converting a linear spectrum to mel bands
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    filters: Vec<Vec<f32>>,
    num_fft_bins: usize,
}

impl MelFilterbank {
    /// Create a mel filterbank
    ///
    /// # Arguments
    /// * `num_fft_bins` - Number of spectrum bins (fft_size / 2 + 1)
    /// * `num_mel_bins` - Number of mel bands
    /// * `sample_rate` - Sample rate in Hz
    /// * `min_freq` - Lower edge of the first band (Hz)
    /// * `max_freq` - Upper edge of the last band (Hz), at most Nyquist
    ///
    /// Band edges are equally spaced in mel; triangle weights are evaluated at
    /// each bin's centre frequency and normalized to unit sum. A band too
    /// narrow to cover any bin stays all-zero.
    pub fn new(
        num_fft_bins: usize,
        num_mel_bins: usize,
        sample_rate: f32,
        min_freq: f32,
        max_freq: f32,
    ) -> Result<Self, AnalysisError> {
        if num_fft_bins < 2 {
            return Err(AnalysisError::SpectrumTooShort(num_fft_bins));
        }
        if !(0.0..max_freq).contains(&min_freq) || max_freq > sample_rate / 2.0 {
            return Err(AnalysisError::FrequencyRange {
                low: min_freq,
                high: max_freq,
                sample_rate,
            });
        }

        let mel_min = hz_to_mel(min_freq);
        let mel_max = hz_to_mel(max_freq);

        // num_mel_bins + 2 edges, equally spaced in mel
        let edges: Vec<f32> = (0..num_mel_bins + 2)
            .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f32 / (num_mel_bins + 1) as f32))
            .collect();

        let mut filters = vec![vec![0.0; num_fft_bins]; num_mel_bins];
        for (m, filter) in filters.iter_mut().enumerate() {
            let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);

            for (k, weight) in filter.iter_mut().enumerate() {
                let f = bin_frequency(k, num_fft_bins, sample_rate);
                *weight = if f > left && f <= center {
                    (f - left) / (center - left)
                } else if f > center && f < right {
                    (right - f) / (right - center)
                } else {
                    0.0
                };
            }

            let sum: f32 = filter.iter().sum();
            if sum > 0.0 {
                filter.iter_mut().for_each(|w| *w /= sum);
            }
        }

        Ok(Self {
            filters,
            num_fft_bins,
        })
    }

    /// Apply filterbank to a (power) spectrum
    pub fn apply(&self, spectrum: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        if spectrum.len() != self.num_fft_bins {
            return Err(AnalysisError::SpectrumSize {
                expected: self.num_fft_bins,
                found: spectrum.len(),
            });
        }
        Ok(self
            .filters
            .iter()
            .map(|filter| filter.iter().zip(spectrum).map(|(&f, &s)| f * s).sum())
            .collect())
    }

    /// Get number of mel bands
    pub fn num_mel_bins(&self) -> usize {
        self.filters.len()
    }

    /// Get number of spectrum bins
    pub fn num_fft_bins(&self) -> usize {
        self.num_fft_bins
    }

    /// Weights of band `m`.
    pub fn filter(&self, m: usize) -> Option<&[f32]> {
        self.filters.get(m).map(Vec::as_slice)
    }
}

/// Orthonormal DCT-II producing the first `outputs` coefficients of an
/// `inputs`-point transform.
#[derive(Debug, Clone)]
pub struct Dct {
    /// Row-major `outputs x inputs` basis.
    basis: Vec<f32>,
    inputs: usize,
    outputs: usize,
}

impl Dct {
    /// Precomputes the basis.
    pub fn new(inputs: usize, outputs: usize) -> Result<Self, AnalysisError> {
        if outputs > inputs {
            return Err(AnalysisError::TooManyCoefficients {
                coefficients: outputs,
                bands: inputs,
            });
        }
        let n = inputs as f32;
        let mut basis = Vec::with_capacity(inputs * outputs);
        for k in 0..outputs {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            for i in 0..inputs {
                basis.push(scale * (PI * k as f32 * (2 * i + 1) as f32 / (2.0 * n)).cos());
            }
        }
        Ok(Self {
            basis,
            inputs,
            outputs,
        })
    }

    /// Transforms `input` (length must equal `inputs`).
    pub fn apply(&self, input: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        if input.len() != self.inputs {
            return Err(AnalysisError::SpectrumSize {
                expected: self.inputs,
                found: input.len(),
            });
        }
        Ok((0..self.outputs)
            .map(|k| {
                self.basis[k * self.inputs..(k + 1) * self.inputs]
                    .iter()
                    .zip(input)
                    .map(|(b, x)| b * x)
                    .sum()
            })
            .collect())
    }
}

/// MFCC settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MfccConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Number of mel bands.
    pub number_bands: usize,
    /// Number of cepstral coefficients.
    pub number_coefficients: usize,
    /// Lower edge of the filterbank (Hz).
    pub low_frequency_bound: f32,
    /// Upper edge of the filterbank (Hz); clamped to Nyquist.
    pub high_frequency_bound: f32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            number_bands: 40,
            number_coefficients: 13,
            low_frequency_bound: 0.0,
            high_frequency_bound: 11000.0,
        }
    }
}

/// Output of one MFCC computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MfccFrame {
    /// Mel band energies (before the log).
    pub bands: Vec<f32>,
    /// Cepstral coefficients.
    pub mfcc: Vec<f32>,
}

/// MFCC processor for magnitude spectra of one fixed length.
#[derive(Debug, Clone)]
pub struct Mfcc {
    config: MfccConfig,
    filterbank: MelFilterbank,
    dct: Dct,
}

impl Mfcc {
    /// Builds the filterbank and DCT for spectra of `num_fft_bins` bins.
    pub fn new(config: MfccConfig, num_fft_bins: usize) -> Result<Self, AnalysisError> {
        let nyquist = config.sample_rate / 2.0;
        let filterbank = MelFilterbank::new(
            num_fft_bins,
            config.number_bands,
            config.sample_rate,
            config.low_frequency_bound,
            config.high_frequency_bound.min(nyquist),
        )?;
        let dct = Dct::new(config.number_bands, config.number_coefficients)?;
        Ok(Self {
            config,
            filterbank,
            dct,
        })
    }

    /// Settings this processor was built with.
    pub fn config(&self) -> &MfccConfig {
        &self.config
    }

    /// Spectrum length this processor accepts.
    pub fn num_fft_bins(&self) -> usize {
        self.filterbank.num_fft_bins()
    }

    /// Computes bands and coefficients of one magnitude spectrum.
    pub fn compute(&self, spectrum: &[f32]) -> Result<MfccFrame, AnalysisError> {
        let power: Vec<f32> = spectrum.iter().map(|&m| m * m).collect();
        let bands = self.filterbank.apply(&power)?;
        let log_bands: Vec<f32> = bands
            .iter()
            .map(|&b| 20.0 * b.max(LOG_FLOOR).log10())
            .collect();
        let mfcc = self.dct.apply(&log_bands)?;
        Ok(MfccFrame { bands, mfcc })
    }
}
