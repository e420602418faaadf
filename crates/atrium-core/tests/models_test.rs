use atrium_core::models::*;
use atrium_core::traits::{IClock, ManualClock};
use chrono::{Duration, TimeZone, Utc};

#[test]
fn pressure_levels_are_ordered_by_severity() {
    assert!(PressureLevel::Normal < PressureLevel::Warning);
    assert!(PressureLevel::Warning < PressureLevel::Critical);
    assert!(PressureLevel::Critical < PressureLevel::Urgent);
    assert_eq!(PressureLevel::Critical.to_string(), "critical");
}

#[test]
fn access_context_serializes_kebab_case() {
    let json = serde_json::to_string(&AccessContext::TabSwitch).unwrap();
    assert_eq!(json, "\"tab-switch\"");
    let back: AccessContext = serde_json::from_str("\"deep-link\"").unwrap();
    assert_eq!(back, AccessContext::DeepLink);
}

#[test]
fn access_event_deserializes_with_validated_key() {
    let json = r#"{"key":"customers","timestamp":"2026-01-01T00:00:00Z","context":"navigation"}"#;
    let event: AccessEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.key.as_str(), "customers");
    assert_eq!(event.context, AccessContext::Navigation);
}

#[test]
fn hit_rate_is_zero_without_lookups() {
    let stats = CacheStatistics::default();
    assert_eq!(stats.hit_rate(), 0.0);
    let stats = CacheStatistics {
        hits: 3,
        misses: 1,
        ..Default::default()
    };
    assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
}

#[test]
fn reuse_rate_counts_reused_acquires() {
    let stats = PoolStatistics {
        acquires: 4,
        reuses: 1,
        ..Default::default()
    };
    assert!((stats.reuse_rate() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn manual_clock_advances() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    clock.advance(Duration::minutes(5));
    assert_eq!(clock.now(), start + Duration::minutes(5));
}
