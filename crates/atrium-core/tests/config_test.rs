use atrium_core::config::*;
use atrium_core::constants::MAX_DURATION_SECS;
use atrium_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = AtriumConfig::from_toml("").unwrap();

    // Store defaults
    assert_eq!(config.store.max_entries, 20);
    assert_eq!(config.store.memory_ceiling_mb, 15);
    assert_eq!(config.store.memory_slack, 1.1);
    assert_eq!(config.store.idle_ttl_secs, 600);
    assert_eq!(config.store.memory_ceiling_bytes(), 15 * 1024 * 1024);

    // Pool defaults
    assert_eq!(config.pool.per_type_cap, 8);
    assert_eq!(config.pool.global_cap, 30);

    // Prediction defaults
    assert_eq!(config.prediction.top_n, 3);
    assert_eq!(config.prediction.min_confidence, 0.7);
    assert_eq!(config.prediction.diagnostic_min_confidence, 0.2);
    assert_eq!(config.prediction.recorder_capacity, 1000);
    assert_eq!(config.prediction.recorder_retain, 800);

    // Pressure defaults
    assert_eq!(config.pressure.warning_cache_fraction, 0.25);
    assert_eq!(config.pressure.critical_pool_fraction, 0.60);

    // Scheduler defaults
    assert_eq!(config.scheduler.worker_threads, 2);
    assert_eq!(config.scheduler.cleanup_interval_secs, 240);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json_logs);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[store]
max_entries = 50

[prediction]
min_confidence = 0.4
"#;
    let config = AtriumConfig::from_toml(toml).unwrap();
    assert_eq!(config.store.max_entries, 50);
    assert_eq!(config.prediction.min_confidence, 0.4);
    // Non-overridden fields keep defaults
    assert_eq!(config.store.memory_ceiling_mb, 15);
    assert_eq!(config.prediction.top_n, 3);
}

#[test]
fn config_roundtrips_through_toml() {
    let config = AtriumConfig::default();
    let text = config.to_toml().unwrap();
    let back = AtriumConfig::from_toml(&text).unwrap();
    assert_eq!(back.store.max_entries, config.store.max_entries);
    assert_eq!(back.pool.global_cap, config.pool.global_cap);
}

#[test]
fn invalid_toml_is_parse_error() {
    let err = AtriumConfig::from_toml("[store\nmax_entries = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn validation_rejects_out_of_range_values() {
    let cases = [
        "[store]\nmax_entries = 0",
        "[store]\nmemory_slack = 0.5",
        "[prediction]\nmin_confidence = 1.5",
        "[pressure]\nwarning_cache_fraction = -0.1",
        "[prediction]\nrecorder_capacity = 10\nrecorder_retain = 20",
        "[scheduler]\nworker_threads = 9",
        "[pool]\nper_type_cap = 10\nglobal_cap = 5",
        "[store]\nmemory_slack = nan",
        "[store]\nmemory_slack = inf",
        "[pressure]\ncritical_pool_fraction = nan",
        "[store]\nidle_ttl_secs = 10000000000000000",
        "[pool]\nidle_ttl_secs = 10000000000000000",
        "[scheduler]\ncleanup_interval_secs = 10000000000000000",
    ];
    for case in cases {
        let err = AtriumConfig::from_toml(case).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationFailed { .. }),
            "expected validation failure for {case:?}, got {err:?}"
        );
    }
}

#[test]
fn env_style_overrides_apply_and_ignore_unknown_keys() {
    let mut config = AtriumConfig::default();
    config
        .apply_overrides(vec![
            ("ATRIUM_STORE_MAX_ENTRIES".to_string(), "7".to_string()),
            ("ATRIUM_PREDICTION_MIN_CONFIDENCE".to_string(), "0.3".to_string()),
            ("ATRIUM_LOG_LEVEL".to_string(), "debug".to_string()),
            ("ATRIUM_UNKNOWN".to_string(), "x".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ])
        .unwrap();
    assert_eq!(config.store.max_entries, 7);
    assert_eq!(config.prediction.min_confidence, 0.3);
    assert_eq!(config.observability.log_level, "debug");
}

#[test]
fn env_style_override_with_bad_number_fails() {
    let mut config = AtriumConfig::default();
    let err = config
        .apply_overrides(vec![(
            "ATRIUM_POOL_GLOBAL_CAP".to_string(),
            "lots".to_string(),
        )])
        .unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn oversized_durations_from_env_fail_validation() {
    for key in [
        "ATRIUM_STORE_IDLE_TTL_SECS",
        "ATRIUM_POOL_IDLE_TTL_SECS",
        "ATRIUM_SCHEDULER_CLEANUP_INTERVAL_SECS",
    ] {
        let mut config = AtriumConfig::default();
        config
            .apply_overrides(vec![(key.to_string(), u64::MAX.to_string())])
            .unwrap();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationFailed { .. }),
            "expected validation failure for {key}, got {err:?}"
        );
    }
}

#[test]
fn duration_accessors_clamp_instead_of_overflowing() {
    let mut config = AtriumConfig::default();
    config.store.idle_ttl_secs = 10_000_000_000_000_000;
    config.pool.idle_ttl_secs = u64::MAX;
    config.scheduler.cleanup_interval_secs = u64::MAX;

    let ceiling = chrono::Duration::seconds(MAX_DURATION_SECS as i64);
    assert_eq!(config.store.idle_ttl(), ceiling);
    assert_eq!(config.pool.idle_ttl(), ceiling);
    assert_eq!(config.scheduler.cleanup_interval(), ceiling);

    config.scheduler.cleanup_interval_secs = 0;
    assert_eq!(config.scheduler.cleanup_interval(), chrono::Duration::seconds(1));
}

#[test]
fn one_year_durations_are_accepted() {
    let mut config = AtriumConfig::default();
    config.store.idle_ttl_secs = MAX_DURATION_SECS;
    config.pool.idle_ttl_secs = MAX_DURATION_SECS;
    config.scheduler.cleanup_interval_secs = MAX_DURATION_SECS;
    assert!(config.validate().is_ok());
}

#[test]
fn load_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("atrium.toml");
    std::fs::write(&path, "[pool]\nper_type_cap = 4\n").unwrap();
    let config = AtriumConfig::load(Some(&path)).unwrap();
    assert_eq!(config.pool.per_type_cap, 4);
}

#[test]
fn load_missing_file_is_file_not_found() {
    let err = AtriumConfig::load(Some(std::path::Path::new("/nonexistent/atrium.toml")))
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}
