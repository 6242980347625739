//! Tests for idle-key eviction.

use docket_throttle::clock::FakeRelativeClock;
use docket_throttle::{RequestThrottler, ThrottleConfig};
use std::sync::Arc;
use std::time::Duration;

fn create_test_throttler() -> (RequestThrottler<u32, FakeRelativeClock>, FakeRelativeClock) {
    let clock = FakeRelativeClock::default();
    let throttler = RequestThrottler::with_clock(ThrottleConfig::default(), clock.clone()).unwrap();
    (throttler, clock)
}

#[test]
fn test_evict_idle_removes_untouched_keys() {
    let (throttler, clock) = create_test_throttler();

    throttler.check(Some("GET"), Some("/api/agencies"));
    throttler.check(Some("GET"), Some("/api/vendors"));
    clock.advance(Duration::from_secs(30));
    throttler.check(Some("GET"), Some("/api/vendors"));
    assert_eq!(*throttler.stats().tracked_keys(), 2);

    clock.advance(Duration::from_secs(15));
    let removed = throttler.evict_idle(Duration::from_secs(20));

    assert_eq!(removed, 1);
    assert_eq!(*throttler.stats().tracked_keys(), 1);
}

#[test]
fn test_evict_idle_never_shortens_below_window() {
    let (throttler, clock) = create_test_throttler();

    throttler.check(Some("GET"), Some("/a"));
    throttler.record_response(Some("GET"), Some("/a"), 1);
    clock.advance(Duration::from_secs(5));

    // Asking for a 1ms idle threshold still keeps records younger than window_ms.
    assert_eq!(throttler.evict_idle(Duration::from_millis(1)), 0);

    clock.advance(Duration::from_secs(5));
    assert_eq!(throttler.evict_idle(Duration::from_millis(1)), 1);
}

#[test]
fn test_evicted_key_behaves_like_fresh_key() {
    let (throttler, clock) = create_test_throttler();

    for _ in 0..6 {
        throttler.check(Some("GET"), Some("/a"));
    }
    clock.advance(Duration::from_secs(11));
    assert_eq!(throttler.evict_idle(Duration::ZERO), 1);

    assert!(throttler.check(Some("GET"), Some("/a")).is_allow());
}

fn burst(throttler: &RequestThrottler<u32, FakeRelativeClock>, url: &str, n: usize) -> Vec<&'static str> {
    (0..n)
        .map(|_| throttler.check(Some("GET"), Some(url)).action())
        .collect()
}

#[test]
fn test_evicted_key_loses_cached_response() {
    let (throttler, clock) = create_test_throttler();

    for url in ["/kept", "/evicted"] {
        assert!(throttler.check(Some("GET"), Some(url)).is_allow());
        throttler.record_response(Some("GET"), Some(url), 1);
    }
    clock.advance(Duration::from_secs(11));

    let kept = burst(&throttler, "/kept", 7);
    assert_eq!(kept, ["allow", "cache", "cache", "cache", "cache", "cache", "cache"]);

    // Touching /kept above reset its idle time, so only /evicted goes.
    assert_eq!(throttler.evict_idle(Duration::ZERO), 1);
    let evicted = burst(&throttler, "/evicted", 7);
    assert_eq!(evicted, ["allow", "allow", "allow", "allow", "allow", "reject", "reject"]);
}

#[test]
fn test_record_response_counts_as_activity() {
    let (throttler, clock) = create_test_throttler();

    throttler.check(Some("GET"), Some("/a"));
    clock.advance(Duration::from_secs(9));
    throttler.record_response(Some("GET"), Some("/a"), 3);
    clock.advance(Duration::from_secs(9));

    assert_eq!(throttler.evict_idle(Duration::from_secs(10)), 0);
}

#[tokio::test]
async fn test_cleanup_loop_evicts_in_background() {
    let config = ThrottleConfig::default()
        .with_window_ms(20)
        .with_min_interval_ms(10);
    let throttler: Arc<RequestThrottler<u32>> = Arc::new(RequestThrottler::new(config).unwrap());

    throttler.check(Some("GET"), Some("/a"));
    throttler.check(Some("GET"), Some("/b"));
    assert_eq!(*throttler.stats().tracked_keys(), 2);

    let handle = throttler.spawn_cleanup_loop(Duration::from_millis(10), Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(*throttler.stats().tracked_keys(), 0);
    handle.abort();
}

#[tokio::test]
async fn test_cleanup_loop_stops_when_throttler_dropped() {
    let throttler: Arc<RequestThrottler<u32>> =
        Arc::new(RequestThrottler::new(ThrottleConfig::default()).unwrap());

    let handle = throttler.spawn_cleanup_loop(Duration::from_millis(5), Duration::from_secs(60));
    drop(throttler);

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("cleanup loop should exit")
        .expect("cleanup task should not panic");
}

#[tokio::test]
async fn test_cleanup_loop_accepts_zero_interval() {
    let config = ThrottleConfig::default()
        .with_window_ms(20)
        .with_min_interval_ms(10);
    let throttler: Arc<RequestThrottler<u32>> = Arc::new(RequestThrottler::new(config).unwrap());
    throttler.check(Some("GET"), Some("/a"));

    let handle = throttler.spawn_cleanup_loop(Duration::ZERO, Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(!handle.is_finished());
    assert_eq!(*throttler.stats().tracked_keys(), 0);
    handle.abort();
}
