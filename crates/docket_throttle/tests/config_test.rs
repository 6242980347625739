//! Tests for throttle configuration loading and validation.

use docket_error::DocketErrorKind;
use docket_throttle::{ThrottleConfig, ThrottleConfigBuilder};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

fn write_toml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_defaults_match_documented_values() {
    let config = ThrottleConfig::default();

    assert_eq!(*config.min_interval_ms(), 1_000);
    assert_eq!(*config.max_per_url(), 5);
    assert_eq!(*config.window_ms(), 10_000);
    assert_eq!(*config.global_max(), 50);
    assert_eq!(*config.cooldown_ms(), 30_000);
    assert_eq!(config.cooldown(), Duration::from_secs(30));
    assert!(config.cleanup_schedule().is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_fills_unset_fields_from_defaults() {
    let config = ThrottleConfigBuilder::default()
        .window_ms(2_000)
        .idle_key_ttl_ms(60_000)
        .cleanup_interval_ms(5_000)
        .build()
        .unwrap();

    assert_eq!(*config.window_ms(), 2_000);
    assert_eq!(*config.max_per_url(), 5);
    assert_eq!(
        config.cleanup_schedule(),
        Some((Duration::from_secs(5), Duration::from_secs(60)))
    );
}

#[test]
fn test_global_max_must_exceed_max_per_url() {
    let config = ThrottleConfig::default()
        .with_max_per_url(10)
        .with_global_max(10);

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("global_max (10) must be greater than max_per_url (10)"));

    assert!(config.with_global_max(11).validate().is_ok());
}

#[test]
fn test_zero_limits_are_rejected() {
    assert!(ThrottleConfig::default().with_max_per_url(0).validate().is_err());
    assert!(ThrottleConfig::default().with_cooldown_ms(0).validate().is_err());
    assert!(
        ThrottleConfig::default()
            .with_cleanup_interval_ms(Some(0))
            .validate()
            .is_err()
    );
    // A zero dedup interval simply disables the dedup layer.
    assert!(ThrottleConfig::default().with_min_interval_ms(0).validate().is_ok());
}

#[test]
fn test_from_file_reads_throttle_table() {
    let file = write_toml(
        r#"
[throttle]
min_interval_ms = 250
max_per_url = 3
global_max = 12
idle_key_ttl_ms = 120000
"#,
    );

    let config = ThrottleConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.min_interval_ms(), 250);
    assert_eq!(*config.max_per_url(), 3);
    assert_eq!(*config.global_max(), 12);
    assert_eq!(*config.idle_key_ttl_ms(), Some(120_000));
    // Unspecified keys keep their defaults.
    assert_eq!(*config.window_ms(), 10_000);
    assert_eq!(*config.cooldown_ms(), 30_000);
}

#[test]
fn test_from_file_without_table_uses_defaults() {
    let file = write_toml("[client]\ntimeout_secs = 5\n");

    let config = ThrottleConfig::from_file(file.path()).unwrap();
    assert_eq!(config, ThrottleConfig::default());
}

#[test]
fn test_from_file_rejects_invalid_values() {
    let file = write_toml("[throttle]\nmax_per_url = 60\nglobal_max = 50\n");

    let err = ThrottleConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("global_max"));
}

#[test]
fn test_from_file_missing_file() {
    let err = ThrottleConfig::from_file("/nonexistent/docket.toml").unwrap_err();
    match err.kind() {
        DocketErrorKind::Config(config) => {
            assert_eq!(config.path.as_deref(), Some(Path::new("/nonexistent/docket.toml")));
        }
        other => panic!("expected configuration error, got {other}"),
    }
}
