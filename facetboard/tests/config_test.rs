//! Tests for config module

use facetboard::config::{expand_tilde, Config};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.report.enabled);
    assert!(config.report.include_subprojects);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
}

#[test]
fn test_expand_tilde() {
    let home = dirs::home_dir().unwrap();

    let expanded = expand_tilde(&PathBuf::from("~/foo")).unwrap();
    assert_eq!(expanded, home.join("foo"));

    let expanded = expand_tilde(&PathBuf::from("~")).unwrap();
    assert_eq!(expanded, home);

    let expanded = expand_tilde(&PathBuf::from("/absolute/path")).unwrap();
    assert_eq!(expanded, PathBuf::from("/absolute/path"));

    let expanded = expand_tilde(&PathBuf::from("relative/path")).unwrap();
    assert_eq!(expanded, PathBuf::from("relative/path"));
}

#[test]
fn test_load_or_create_writes_defaults() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");

    let config = Config::load_or_create(&config_path).unwrap();
    assert!(config_path.exists());
    assert!(config.report.enabled);
}

#[test]
fn test_save_and_load() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");

    let mut config = Config::default();
    config.report.include_subprojects = false;
    config.logging.level = "debug".to_string();
    config.logging.file = Some(temp.path().join("report.log"));

    config.save(&config_path).unwrap();

    let loaded = Config::load_or_create(&config_path).unwrap();
    assert!(!loaded.report.include_subprojects);
    assert_eq!(loaded.logging.level, "debug");
    assert_eq!(loaded.logging.file, Some(temp.path().join("report.log")));
}

#[test]
fn test_partial_file_fills_defaults() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(&config_path, "[report]\ninclude_subprojects = false\n").unwrap();

    let loaded = Config::load_or_create(&config_path).unwrap();
    assert!(!loaded.report.include_subprojects);
    assert!(loaded.report.enabled);
    assert_eq!(loaded.logging.level, "info");
}
