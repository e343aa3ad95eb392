use std::sync::Arc;

use weave_cache::ContextCache;
use weave_core::clock::{Clock, SystemClock};
use weave_core::errors::{WeaveError, WeaveResult};
use weave_core::{IContextScorer, IContextStrategy, WeaveConfig};
use weave_optimizer::ContextOptimizer;
use weave_selector::AdaptiveSelector;

use crate::manager::ContextManager;

/// Assembles a [`ContextManager`]. Strategies are kept in registration
/// order, which is also the selector's tie-break order.
pub struct ContextManagerBuilder {
    config: WeaveConfig,
    strategies: Vec<Arc<dyn IContextStrategy>>,
    scorer: Option<Arc<dyn IContextScorer>>,
    clock: Arc<dyn Clock>,
    install_tracing: bool,
}

impl ContextManagerBuilder {
    pub(crate) fn new(config: WeaveConfig) -> Self {
        Self {
            config,
            strategies: Vec::new(),
            scorer: None,
            clock: Arc::new(SystemClock),
            install_tracing: false,
        }
    }

    pub fn strategy(mut self, strategy: Arc<dyn IContextStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn scorer(mut self, scorer: Arc<dyn IContextScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Install the process-wide subscriber from `config.observability` on
    /// `build`. Has no effect if tracing was already initialized.
    pub fn with_tracing(mut self) -> Self {
        self.install_tracing = true;
        self
    }

    /// Validate the configuration and strategy set, then start the cache.
    pub fn build(self) -> WeaveResult<ContextManager> {
        self.config.validate()?;
        if self.install_tracing {
            weave_observability::init_tracing_from_config(&self.config.observability);
        }

        for (i, strategy) in self.strategies.iter().enumerate() {
            let kind = strategy.kind();
            if self.strategies[..i].iter().any(|s| s.kind() == kind) {
                return Err(WeaveError::InvalidOptions {
                    field: "strategy".to_string(),
                    reason: format!("{kind} registered more than once"),
                });
            }
        }

        let cache = ContextCache::with_clock(&self.config.cache, Arc::clone(&self.clock));
        let selector = AdaptiveSelector::new(self.config.selector.clone());
        let optimizer = ContextOptimizer::new(self.config.optimizer.clone());

        tracing::info!(
            strategies = self.strategies.len(),
            has_scorer = self.scorer.is_some(),
            sweeper = cache.has_sweeper(),
            "context manager ready"
        );

        Ok(ContextManager {
            config: self.config,
            strategies: self.strategies,
            scorer: self.scorer,
            selector,
            cache,
            optimizer,
            clock: self.clock,
        })
    }
}
