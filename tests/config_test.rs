//! Configuration loading tests
//!
//! Tests that configuration is created with sensible defaults and that
//! persisted values round-trip.

use t2s::engine::{DEFAULT_FALLBACK_VOICE, MODEL_ID};
use t2s::state::config::Config;

#[test]
fn test_config_created_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".t2s.cfg");

    let config = Config::load_from(path.clone()).expect("Failed to create config");

    assert!(path.exists());
    assert_eq!(config.rate(), 1.0);
    assert_eq!(config.preferred_locale(), "en");
    assert_eq!(config.fallback_voice(), DEFAULT_FALLBACK_VOICE);
    assert_eq!(config.model(), MODEL_ID);
    assert!(config.engine_program().is_none());
}

#[test]
fn test_config_values_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".t2s.cfg");

    let mut config = Config::load_from(path.clone()).expect("create");
    config.set("speech", "rate", "1.5");
    config.set("speech", "fallback_voice", "am_adam");
    config.set("engine", "program", "/opt/kokoro/bin/koko");
    config.save().expect("save");

    let reloaded = Config::load_from(path).expect("reload");
    assert_eq!(reloaded.rate(), 1.5);
    assert_eq!(reloaded.fallback_voice(), "am_adam");
    assert_eq!(reloaded.engine_program().as_deref(), Some("/opt/kokoro/bin/koko"));
}

#[test]
fn test_export_dir_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".t2s.cfg");

    let mut config = Config::load_from(path).expect("create");

    // No override: platform downloads directory, else the working directory
    let expected = dirs::download_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    assert_eq!(config.export_dir(), expected);

    config.set("export", "directory", "/tmp/t2s-out");
    assert_eq!(config.export_dir(), std::path::PathBuf::from("/tmp/t2s-out"));
}

#[test]
fn test_malformed_float_falls_back_to_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".t2s.cfg");

    let mut config = Config::load_from(path).expect("create");
    config.set("speech", "rate", "fast");
    assert_eq!(config.rate(), 1.0);
}
