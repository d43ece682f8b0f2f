//! Extractor parameter file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use cepstra_core::{MAX_FRAME_SIZE, ParameterMap};

use crate::error::ConfigError;

/// Frame segmentation and sample rate used by the extractor.
///
/// Every field is optional in the file and falls back to its default.
/// The extractor's parameter names (`frameSize`, ...) are accepted as aliases.
///
/// # TOML Format
///
/// ```toml
/// frame_size = 2048
/// hop_size = 1024
/// sample_rate = 44100.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractorParams {
    /// Frame length in samples.
    #[serde(alias = "frameSize")]
    pub frame_size: u32,

    /// Distance between frame starts in samples.
    #[serde(alias = "hopSize")]
    pub hop_size: u32,

    /// Sample rate of the analysed signal in Hz.
    #[serde(alias = "sampleRate")]
    pub sample_rate: f64,
}

impl Default for ExtractorParams {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 1024,
            sample_rate: 44100.0,
        }
    }
}

impl ExtractorParams {
    /// Set the frame size.
    pub fn with_frame_size(mut self, frame_size: u32) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Set the hop size.
    pub fn with_hop_size(mut self, hop_size: u32) -> Self {
        self.hop_size = hop_size;
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Load and validate parameters from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate parameters from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let params: ExtractorParams = toml::from_str(toml_str)?;
        params.validate()?;
        Ok(params)
    }

    /// Save the parameters to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the parameters to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field against the extractor's accepted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let within = |min: usize, v: u32| (min..=MAX_FRAME_SIZE).contains(&(v as usize));
        if !within(2, self.frame_size) {
            return Err(ConfigError::Invalid {
                field: "frame_size",
                reason: format!("must be in [2, {MAX_FRAME_SIZE}], got {}", self.frame_size),
            });
        }
        if !within(1, self.hop_size) {
            return Err(ConfigError::Invalid {
                field: "hop_size",
                reason: format!("must be in [1, {MAX_FRAME_SIZE}], got {}", self.hop_size),
            });
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "sample_rate",
                reason: format!("must be a positive number of Hz, got {}", self.sample_rate),
            });
        }
        Ok(())
    }

    /// Parameter overrides for the extractor (`frameSize`, `hopSize`,
    /// `sampleRate`).
    pub fn to_parameter_map(&self) -> ParameterMap {
        ParameterMap::new()
            .with("frameSize", i64::from(self.frame_size))
            .with("hopSize", i64::from(self.hop_size))
            .with("sampleRate", self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cepstra_core::ParamValue;

    #[test]
    fn test_defaults() {
        let params = ExtractorParams::default();
        assert_eq!(params.frame_size, 2048);
        assert_eq!(params.hop_size, 1024);
        assert_eq!(params.sample_rate, 44100.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let params = ExtractorParams::from_toml("hop_size = 512").unwrap();
        assert_eq!(params.frame_size, 2048);
        assert_eq!(params.hop_size, 512);
    }

    #[test]
    fn test_camel_case_aliases() {
        let params =
            ExtractorParams::from_toml("frameSize = 1024\nhopSize = 256\nsampleRate = 22050.0")
                .unwrap();
        assert_eq!(params, ExtractorParams::default()
            .with_frame_size(1024)
            .with_hop_size(256)
            .with_sample_rate(22050.0));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ExtractorParams::from_toml("frame_size = 0"),
            Err(ConfigError::Invalid { field: "frame_size", .. })
        ));
        assert!(matches!(
            ExtractorParams::from_toml("frame_size = 1"),
            Err(ConfigError::Invalid { field: "frame_size", .. })
        ));
        assert!(matches!(
            ExtractorParams::from_toml("hop_size = 4000000000"),
            Err(ConfigError::Invalid { field: "hop_size", .. })
        ));
        assert!(matches!(
            ExtractorParams::from_toml("sample_rate = -8000.0"),
            Err(ConfigError::Invalid { field: "sample_rate", .. })
        ));
        assert!(matches!(
            ExtractorParams::from_toml("hop_size = \"fast\""),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let params = ExtractorParams::default().with_hop_size(441);
        let toml = params.to_toml().unwrap();
        assert!(toml.contains("hop_size = 441"));
        assert_eq!(ExtractorParams::from_toml(&toml).unwrap(), params);
    }

    #[test]
    fn test_parameter_map() {
        let map = ExtractorParams::default().with_frame_size(4096).to_parameter_map();
        assert_eq!(map.int("frameSize"), Some(4096));
        assert_eq!(map.int("hopSize"), Some(1024));
        assert_eq!(map.get("sampleRate"), Some(&ParamValue::Real(44100.0)));
    }
}
