//! Cepstra Analysis - frame-level signal processing primitives
//!
//! The building blocks behind the low-level feature extractor, usable on
//! their own without the dataflow graph:
//!
//! - [`frame`] - Frame segmentation, silent-frame detection and noise fill
//! - [`window`] - Cosine-sum analysis windows and zero-phase rotation
//! - [`fft`] - FFT wrapper returning magnitude spectra
//! - [`spectrum`] - Magnitude spectrum and spectral roll-off
//! - [`dynamics`] - RMS and zero-crossing rate
//! - [`mel`] - Mel filterbank, orthonormal DCT and MFCC
//!
//! ## Example
//!
//! ```rust
//! use cepstra_analysis::{Mfcc, MfccConfig, Window, frames, magnitude_spectrum, rms};
//!
//! let signal: Vec<f32> = (0..8192).map(|i| (i as f32 * 0.05).sin()).collect();
//! let mfcc = Mfcc::new(MfccConfig::default(), 1025).unwrap();
//!
//! for frame in frames(&signal, 2048, 1024) {
//!     let spectrum = magnitude_spectrum(&frame, Window::BlackmanHarris62);
//!     let coefficients = mfcc.compute(&spectrum).unwrap().mfcc;
//!     assert_eq!(coefficients.len(), 13);
//!     assert!(rms(&spectrum) > 0.0);
//! }
//! ```

pub mod dynamics;
pub mod error;
pub mod fft;
pub mod frame;
pub mod mel;
pub mod spectrum;
pub mod window;

pub use dynamics::{rms, zero_crossing_rate};
pub use error::AnalysisError;
pub use fft::{Fft, magnitude_db};
pub use frame::{
    FrameSlicer, NoiseGenerator, SilencePolicy, frame_count, frames, instant_power, is_silent,
};
pub use mel::{Dct, MelFilterbank, Mfcc, MfccConfig, MfccFrame, hz_to_mel, mel_to_hz};
pub use spectrum::{bin_frequency, magnitude_spectrum, spectral_rolloff};
pub use window::{Window, zero_phase};
