//! Integration tests for cepstra-config.
//!
//! These tests exercise file round trips through a temporary directory.

use cepstra_config::{ConfigError, ExtractorParams, find_config};
use tempfile::TempDir;

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("cepstra.toml");

    let params = ExtractorParams::default().with_frame_size(1024).with_hop_size(512);
    params.save(&path).unwrap();

    assert!(path.exists());
    assert_eq!(ExtractorParams::load(&path).unwrap(), params);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ExtractorParams::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_load_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "hop_size = 0\n").unwrap();

    let err = ExtractorParams::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "hop_size", .. }));
}

#[test]
fn test_find_config_prefers_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    ExtractorParams::default().save(&path).unwrap();

    assert_eq!(find_config(Some(path.as_path())), Some(path.clone()));
}
