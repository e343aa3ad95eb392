use weave_core::errors::*;

#[test]
fn invalid_strategy_carries_name() {
    let err = WeaveError::InvalidStrategy {
        name: "beam".into(),
    };
    assert!(err.to_string().contains("beam"));
}

#[test]
fn strategy_error_is_transparent() {
    let inner = StrategyError::BuildFailed {
        strategy: "rag".into(),
        reason: "index offline".into(),
    };
    let expected = inner.to_string();
    let err: WeaveError = inner.into();
    assert_eq!(err.to_string(), expected);
    assert!(matches!(err, WeaveError::Strategy(StrategyError::BuildFailed { .. })));
}

#[test]
fn request_error_converts_via_from() {
    let err: WeaveError = RequestError::InvalidMaxTokens {
        value: 0,
        max: 100_000,
    }
    .into();
    let msg = err.to_string();
    assert!(msg.contains("100000"));
    assert!(msg.contains("got 0"));
}

#[test]
fn conflicting_sources_lists_ids() {
    let err = RequestError::ConflictingSources {
        ids: vec!["docs".into()],
    };
    assert!(err.to_string().contains("docs"));
}

#[test]
fn quality_score_error_carries_value() {
    let err = WeaveError::InvalidQualityScore { score: 1.5 };
    assert!(err.to_string().contains("1.5"));
}

#[test]
fn config_error_converts_via_from() {
    let err: WeaveError = ConfigError::ValidationFailed {
        field: "cache.default_ttl_minutes".into(),
        message: "must be greater than 0".into(),
    }
    .into();
    assert!(err.to_string().contains("cache.default_ttl_minutes"));
}

#[test]
fn serde_json_error_converts_via_from() {
    let err: WeaveError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, WeaveError::Serialization(_)));
}
