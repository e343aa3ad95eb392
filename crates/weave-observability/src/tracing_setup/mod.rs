//! Tracing initialization and configuration.

pub mod events;
pub mod spans;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weave_core::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Environment variable holding per-crate log directives.
pub const LOG_ENV_VAR: &str = "WEAVE_LOG";

const FALLBACK_FILTER: &str = "weave=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Initialize human-readable logging.
///
/// Reads `WEAVE_LOG` for directives, e.g. `WEAVE_LOG=weave_cache=debug,weave_selector=info`.
/// Falls back to `weave=info` when unset or invalid. Only the first
/// initialization in a process takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(env_filter())
            .try_init();
    });
}

/// Initialize JSON logging with the same filter rules as [`init_tracing`].
pub fn init_tracing_json() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .with(env_filter())
            .try_init();
    });
}

/// Initialize with an explicit filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init();
    });
}

/// Initialize from configuration: `json_logs` picks the format and
/// `log_level` sets the level for every weave crate. Directives in `WEAVE_LOG`
/// still take precedence when set.
pub fn init_tracing_from_config(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        EnvFilter::try_new(config_directive(config))
            .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
    });
    let json = config.json_logs;
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(filter);
        let _ = if json {
            registry
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_thread_ids(true))
                .try_init()
        };
    });
}

fn config_directive(config: &ObservabilityConfig) -> String {
    format!("weave={}", config.log_level.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_level_applies_to_all_weave_crates() {
        let config = ObservabilityConfig {
            log_level: " DEBUG".to_string(),
            json_logs: false,
        };
        assert_eq!(config_directive(&config), "weave=debug");
        assert!(EnvFilter::try_new(config_directive(&config)).is_ok());
    }

    #[test]
    fn default_config_matches_fallback() {
        assert_eq!(
            config_directive(&ObservabilityConfig::default()),
            FALLBACK_FILTER
        );
    }
}
