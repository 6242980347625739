//! Tests for layered client configuration.

use docket_client::DocketConfig;
use docket_error::DocketErrorKind;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_load_bundled_defaults() {
    let config = DocketConfig::load().unwrap();

    assert_eq!(*config.throttle.min_interval_ms(), 1_000);
    assert_eq!(*config.throttle.max_per_url(), 5);
    assert_eq!(*config.throttle.window_ms(), 10_000);
    assert_eq!(*config.throttle.global_max(), 50);
    assert_eq!(*config.throttle.cooldown_ms(), 30_000);
    assert_eq!(
        config.throttle.cleanup_schedule(),
        Some((Duration::from_secs(60), Duration::from_secs(600)))
    );
    assert_eq!(*config.client.timeout_secs(), 30);
    assert!(config.client.base_url().is_none());
}

#[test]
fn test_from_file_overrides_sections() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[throttle]
max_per_url = 2
global_max = 8

[client]
base_url = "https://records.example.org"
timeout_secs = 5
"#
    )
    .unwrap();

    let config = DocketConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.throttle.max_per_url(), 2);
    assert_eq!(*config.throttle.global_max(), 8);
    assert_eq!(*config.throttle.cooldown_ms(), 30_000);
    assert_eq!(
        config.client.base_url().as_deref(),
        Some("https://records.example.org")
    );
    assert_eq!(config.client.timeout(), Duration::from_secs(5));
    assert!(config.client.user_agent().starts_with("docket/"));
}

#[test]
fn test_from_file_validates_throttle() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[throttle]\nmax_per_url = 9\nglobal_max = 9").unwrap();

    let err = DocketConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("global_max"));
    match err.kind() {
        DocketErrorKind::Config(config) => assert_eq!(config.path.as_deref(), Some(file.path())),
        other => panic!("expected configuration error, got {other}"),
    }
}
