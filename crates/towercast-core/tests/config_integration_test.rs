//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use towercast_core::config::{ConfigSource, ServiceConfig, CONFIG_PATH_ENV};

const ENV_KEYS: &[&str] = &[
    CONFIG_PATH_ENV,
    "TOWERCAST_PORT",
    "TOWERCAST_SIGNAL_SERVER",
    "TOWERCAST_SDF_DIR",
    "TOWERCAST_OUTPUT_DIR",
    "TOWERCAST_CONVERT",
    "TOWERCAST_ORIGIN_SUFFIX",
    "DATABASE_URL",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
#[serial]
fn test_env_overrides_defaults() {
    clear_env();
    env::set_var("TOWERCAST_PORT", "9090");
    env::set_var("TOWERCAST_OUTPUT_DIR", "/tmp/coverage-out");

    let config = ServiceConfig::with_defaults().load_from_env();

    assert_eq!(config.port.value, 9090);
    assert_eq!(config.port.source, ConfigSource::Environment);
    assert_eq!(config.output_dir.value, PathBuf::from("/tmp/coverage-out"));
    assert_eq!(config.sdf_dir.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
[server]
port = 8080

[market]
allowed_origin_suffix = "example.org"
"#,
    );
    env::set_var("TOWERCAST_PORT", "7070");

    let config = ServiceConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.port.value, 7070);
    assert_eq!(config.port.source, ConfigSource::Environment);
    assert_eq!(config.allowed_origin_suffix.value, "example.org");
    assert_eq!(config.allowed_origin_suffix.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_value_is_ignored() {
    clear_env();
    env::set_var("TOWERCAST_PORT", "not-a-port");

    let config = ServiceConfig::with_defaults().load_from_env();

    assert_eq!(config.port.value, 80);
    assert_eq!(config.port.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_empty_database_url_is_unset() {
    clear_env();
    env::set_var("DATABASE_URL", "  ");

    let config = ServiceConfig::with_defaults().load_from_env();
    assert!(config.database_url.value.is_none());

    clear_env();
}

#[test]
#[serial]
fn test_load_reads_file_named_by_env() {
    clear_env();
    let file = config_file(
        r#"
[coverage]
convert_path = "/usr/local/bin/magick"
output_prefix = "cov-"
"#,
    );
    env::set_var(CONFIG_PATH_ENV, file.path());
    env::set_var("DATABASE_URL", "postgresql://localhost/gis");

    let config = ServiceConfig::load().unwrap();

    assert_eq!(config.convert_path.value, PathBuf::from("/usr/local/bin/magick"));
    assert_eq!(config.output_prefix.value, "cov-");
    assert_eq!(config.database_url.value.as_deref(), Some("postgresql://localhost/gis"));
    assert_eq!(config.database_url.source, ConfigSource::Environment);

    clear_env();
}

#[test]
#[serial]
fn test_load_fails_on_missing_file() {
    clear_env();
    env::set_var(CONFIG_PATH_ENV, "/nonexistent/towercast.toml");

    assert!(ServiceConfig::load().is_err());

    clear_env();
}
