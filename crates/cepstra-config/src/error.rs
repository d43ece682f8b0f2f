//! Errors raised while loading, saving or validating parameter files.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parameter file error.
///
/// I/O variants keep the path they failed on; TOML variants wrap the
/// `toml` crate's errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parameter file could not be read.
    #[error("cannot read '{path}': {source}")]
    ReadFile {
        /// File that was opened.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: io::Error,
    },

    /// The parameter file could not be written.
    #[error("cannot write '{path}': {source}")]
    WriteFile {
        /// File that was written.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: io::Error,
    },

    /// A parent directory could not be created.
    #[error("cannot create directory '{path}': {source}")]
    CreateDir {
        /// Directory that was created.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML or has fields of the wrong type.
    #[error("malformed parameter file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The parameters could not be encoded.
    #[error("cannot encode parameters: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A well-formed value the extractor cannot use.
    #[error("{field}: {reason}")]
    Invalid {
        /// Field name as written in the file.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn read_file(path: &Path, source: io::Error) -> Self {
        Self::ReadFile {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write_file(path: &Path, source: io::Error) -> Self {
        Self::WriteFile {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn create_dir(path: &Path, source: io::Error) -> Self {
        Self::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path involved in an I/O failure, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ReadFile { path, .. } | Self::WriteFile { path, .. } | Self::CreateDir { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn denied() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn test_io_errors_keep_path_and_cause() {
        let path = Path::new("/etc/cepstra.toml");
        for err in [
            ConfigError::read_file(path, denied()),
            ConfigError::write_file(path, denied()),
            ConfigError::create_dir(path, denied()),
        ] {
            assert_eq!(err.path(), Some(path));
            assert!(err.source().is_some());
            assert!(err.to_string().contains("/etc/cepstra.toml"), "{err}");
        }
    }

    #[test]
    fn test_invalid_names_the_field() {
        let err = ConfigError::Invalid {
            field: "hop_size",
            reason: "must be positive".to_string(),
        };
        assert_eq!(err.to_string(), "hop_size: must be positive");
        assert_eq!(err.path(), None);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = toml::from_str::<toml::Table>("frame_size = ").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(err.to_string().starts_with("malformed parameter file"));
    }
}
