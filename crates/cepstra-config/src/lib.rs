//! Configuration for cepstra feature extraction.
//!
//! # Features
//!
//! - **Parameter files**: Load and save [`ExtractorParams`] as TOML
//! - **Validation**: Reject sizes and rates the extractor cannot use
//! - **Paths**: Platform-specific config directory and default file
//!
//! # Example
//!
//! ```rust
//! use cepstra_config::ExtractorParams;
//!
//! let params = ExtractorParams::from_toml("frame_size = 1024\nhop_size = 512").unwrap();
//! let overrides = params.to_parameter_map();
//! assert_eq!(overrides.int("frameSize"), Some(1024));
//! ```

mod error;
mod params;

/// Platform-specific paths for configuration.
pub mod paths;

pub use error::ConfigError;
pub use params::ExtractorParams;
pub use paths::{default_config_file, find_config, user_config_dir};
