//! Errors raised by the analysis primitives.

use thiserror::Error;

/// Input or configuration an analysis primitive cannot handle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Window name not recognised.
    #[error("unknown window type '{0}'")]
    UnknownWindow(String),

    /// Silence policy name not recognised.
    #[error("unknown silent-frame policy '{0}'")]
    UnknownSilencePolicy(String),

    /// A spectrum arrived with a different length than the one the processor
    /// was built for.
    #[error("spectrum has {found} bins, expected {expected}")]
    SpectrumSize {
        /// Bins the processor was built for.
        expected: usize,
        /// Bins received.
        found: usize,
    },

    /// A spectrum is too short to carry any frequency information.
    #[error("spectrum needs at least 2 bins, got {0}")]
    SpectrumTooShort(usize),

    /// Frequency bounds are inverted or outside `[0, nyquist]`.
    #[error("invalid frequency range [{low}, {high}] Hz at sample rate {sample_rate}")]
    FrequencyRange {
        /// Lower bound in Hz.
        low: f32,
        /// Upper bound in Hz.
        high: f32,
        /// Sample rate in Hz.
        sample_rate: f32,
    },

    /// More cepstral coefficients requested than mel bands exist.
    #[error("{coefficients} coefficients requested from {bands} bands")]
    TooManyCoefficients {
        /// Requested coefficients.
        coefficients: usize,
        /// Available bands.
        bands: usize,
    },
}
