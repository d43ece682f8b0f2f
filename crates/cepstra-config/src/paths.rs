//! Platform-specific configuration paths.
//!
//! - **User config**: `~/.config/cepstra/` (Linux), `~/Library/Application Support/cepstra/` (macOS), `%APPDATA%\cepstra\` (Windows)
//! - **Default config file**: `cepstra.toml` inside the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use cepstra_config::{ExtractorParams, paths};
//!
//! let path = paths::default_config_file();
//! let params = if path.exists() {
//!     ExtractorParams::load(&path).unwrap()
//! } else {
//!     ExtractorParams::default()
//! };
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "cepstra";

/// File name of the default configuration file.
const CONFIG_FILE: &str = "cepstra.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the default configuration file.
pub fn default_config_file() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Resolve the configuration file to load.
///
/// An explicit path is returned as-is when it exists. Without one, the
/// default config file is used if present.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => path.is_file().then(|| path.to_path_buf()),
        None => {
            let default = default_config_file();
            default.is_file().then_some(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_config_dir_ends_with_app_name() {
        assert!(user_config_dir().ends_with(APP_NAME));
    }

    #[test]
    fn test_default_config_file_inside_config_dir() {
        let file = default_config_file();
        assert_eq!(file.parent(), Some(user_config_dir().as_path()));
        assert!(file.ends_with(CONFIG_FILE));
    }

    #[test]
    fn test_find_config_explicit_missing() {
        assert_eq!(find_config(Some(Path::new("/nonexistent/cepstra.toml"))), None);
    }
}
