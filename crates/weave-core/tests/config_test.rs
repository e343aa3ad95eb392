use weave_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = WeaveConfig::from_toml("").unwrap();

    // Optimizer defaults
    assert_eq!(config.optimizer.similarity_threshold, 0.85);
    assert_eq!(config.optimizer.merge_threshold, 0.7);
    assert_eq!(config.optimizer.compression_threshold, 1_000);
    assert_eq!(config.optimizer.min_relevance_score, 0.2);
    assert_eq!(config.optimizer.summary_ratio, 0.3);
    assert_eq!(config.optimizer.aggressive_relevance_floor, 0.7);
    assert_eq!(config.optimizer.aggressive_factor, 1.5);

    // Cache defaults
    assert_eq!(config.cache.default_ttl_minutes, 15);
    assert_eq!(config.cache.sweep_interval_secs, 60);
    assert!(config.cache.sweep_enabled);

    // Selector defaults
    assert_eq!(config.selector.learning_rate, 0.1);
    assert_eq!(config.selector.target_score, 0.7);
    assert_eq!(config.selector.base_weight, 0.3);
    assert_eq!(config.selector.feature_weight, 0.3);
    assert_eq!(config.selector.historical_weight, 0.4);
    assert_eq!(config.selector.initial_feature_weight, 0.5);

    // Manager / observability defaults
    assert_eq!(config.manager.default_max_tokens, 8_000);
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json_logs);

    assert!(config.validate().is_ok());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[optimizer]
similarity_threshold = 0.9

[cache]
default_ttl_minutes = 30
"#;
    let config = WeaveConfig::from_toml(toml).unwrap();
    assert_eq!(config.optimizer.similarity_threshold, 0.9);
    assert_eq!(config.cache.default_ttl_minutes, 30);
    // Non-overridden fields keep defaults
    assert_eq!(config.optimizer.merge_threshold, 0.7);
    assert_eq!(config.cache.sweep_interval_secs, 60);
}

#[test]
fn config_rejects_malformed_toml() {
    let err = WeaveConfig::from_toml("[cache\nttl = ").unwrap_err();
    assert!(matches!(
        err,
        weave_core::errors::ConfigError::ParseError { .. }
    ));
}

#[test]
fn validate_rejects_out_of_range_threshold() {
    let mut config = WeaveConfig::default();
    config.optimizer.similarity_threshold = 1.5;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("optimizer.similarity_threshold"));
}

#[test]
fn validate_rejects_selector_weights_not_summing_to_one() {
    let mut config = WeaveConfig::default();
    config.selector.historical_weight = 0.5;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_zero_ttl_and_oversized_budget() {
    let mut config = WeaveConfig::default();
    config.cache.default_ttl_minutes = 0;
    assert!(config.validate().is_err());

    let mut config = WeaveConfig::default();
    config.cache.default_ttl_minutes = u64::MAX;
    assert!(config.validate().is_err());
    config.cache.default_ttl_minutes = weave_core::constants::MAX_CACHE_TTL_MINUTES;
    assert!(config.validate().is_ok());

    let mut config = WeaveConfig::default();
    config.manager.default_max_tokens = 100_001;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_unknown_log_level() {
    let mut config = WeaveConfig::default();
    config.observability.log_level = "loud".to_string();
    assert!(config.validate().is_err());
    config.observability.log_level = "WARN".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn from_file_reports_missing_file() {
    let err = WeaveConfig::from_file(std::path::Path::new("/nonexistent/weave.toml")).unwrap_err();
    assert!(matches!(
        err,
        weave_core::errors::ConfigError::FileNotFound { .. }
    ));
}

#[test]
fn env_overrides_apply_and_ignore_garbage() {
    std::env::set_var(ENV_CACHE_TTL_MINUTES, "42");
    std::env::set_var(ENV_DEFAULT_MAX_TOKENS, "not-a-number");
    std::env::set_var(ENV_LOG_LEVEL, " DEBUG ");

    let mut config = WeaveConfig::default();
    config.apply_env_overrides();

    std::env::remove_var(ENV_CACHE_TTL_MINUTES);
    std::env::remove_var(ENV_DEFAULT_MAX_TOKENS);
    std::env::remove_var(ENV_LOG_LEVEL);

    assert_eq!(config.cache.default_ttl_minutes, 42);
    assert_eq!(config.manager.default_max_tokens, 8_000);
    assert_eq!(config.observability.log_level, "debug");
}
