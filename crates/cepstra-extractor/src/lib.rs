//! Cepstra Extractor - low-level audio features from a sample buffer.
//!
//! Two layers:
//!
//! - [`LowLevelExtractor`] - a [`Composite`](cepstra_core::Composite) owning
//!   the FrameCutter, Windowing, Spectrum, MFCC, RMS, RollOff and
//!   ZeroCrossingRate graph, exposed through one sink (`signal`) and four
//!   sources (`mfcc`, `spectral_rms`, `spectral_rolloff`, `zerocrossingrate`)
//! - [`BatchExtractor`] - runs that graph over a whole buffer and returns
//!   [`Features`], ready for the next buffer
//!
//! ## Parameters
//!
//! | Name | Type | Range | Default |
//! |------|------|-------|---------|
//! | frameSize | integer | [2, 1048576] | 2048 |
//! | hopSize | integer | [1, 1048576] | 1024 |
//! | sampleRate | real | (0, inf) | 44100 |
//!
//! ## Example
//!
//! ```rust
//! use cepstra_core::ParameterMap;
//! use cepstra_extractor::BatchExtractor;
//!
//! let mut extractor = BatchExtractor::new().unwrap();
//! extractor
//!     .configure(&ParameterMap::new().with("sampleRate", 16000.0))
//!     .unwrap();
//!
//! let signal: Vec<f32> = (0..16000).map(|i| (i as f32 * 0.05).sin()).collect();
//! let features = extractor.compute(&signal).unwrap();
//! assert_eq!(features.spectral_rolloff.len(), features.frame_count());
//! ```
//!
//! # Feature Flags
//!
//! - `tracing` - debug events for graph construction, configuration and runs

pub mod batch;
pub mod features;
pub mod low_level;

pub use batch::{BatchExtractor, keys};
pub use features::Features;
pub use low_level::{LowLevelExtractor, WINDOW_TYPE};
