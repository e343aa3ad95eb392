//! ContextManager — the façade sequencing cache, selection, strategy, and optimizer.

use std::sync::Arc;

use weave_cache::{generate_key, CacheStats, ContextCache};
use weave_core::clock::Clock;
use weave_core::errors::{WeaveError, WeaveResult};
use weave_core::models::{ScoreResult, Suggestion};
use weave_core::{
    BuildOptions, BuiltContext, IContextScorer, IContextStrategy, StrategyKind, WeaveConfig,
};
use weave_observability::tracing_setup::events;
use weave_optimizer::ContextOptimizer;
use weave_selector::{AdaptiveSelector, Selection, StrategyScore};

use crate::builder::ContextManagerBuilder;
use crate::invalidation::CacheInvalidation;

/// Builds bounded context for queries. Holds no per-request state.
pub struct ContextManager {
    pub(crate) config: WeaveConfig,
    pub(crate) strategies: Vec<Arc<dyn IContextStrategy>>,
    pub(crate) scorer: Option<Arc<dyn IContextScorer>>,
    pub(crate) selector: AdaptiveSelector,
    pub(crate) cache: ContextCache,
    pub(crate) optimizer: ContextOptimizer,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ContextManager {
    pub fn builder(config: WeaveConfig) -> ContextManagerBuilder {
        ContextManagerBuilder::new(config)
    }

    pub fn config(&self) -> &WeaveConfig {
        &self.config
    }

    /// Registered strategies in registration order.
    pub fn available_strategies(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Options with `max_tokens` filled from the configured default, so
    /// selection, building and feedback all see the same budget.
    fn resolve(&self, options: &BuildOptions) -> BuildOptions {
        let mut resolved = options.clone();
        resolved.max_tokens = Some(options.max_tokens_or(self.config.manager.default_max_tokens));
        resolved
    }

    fn strategy_for(&self, kind: StrategyKind) -> Option<&Arc<dyn IContextStrategy>> {
        self.strategies.iter().find(|s| s.kind() == kind)
    }

    /// Build context for `query`, serving from the cache when possible.
    ///
    /// An explicit strategy that is not registered fails before any work is
    /// done. Strategy errors are returned unchanged and nothing is cached.
    pub fn build_context(&self, query: &str, options: &BuildOptions) -> WeaveResult<BuiltContext> {
        options.validate()?;

        let explicit = match options.strategy.explicit() {
            Some(kind) => Some(self.strategy_for(kind).ok_or_else(|| {
                WeaveError::InvalidStrategy {
                    name: kind.as_str().to_string(),
                }
            })?),
            None => None,
        };

        let max_tokens = options.max_tokens_or(self.config.manager.default_max_tokens);
        let _span = weave_observability::build_span!(options.strategy_atom(), max_tokens).entered();

        let key = generate_key(query, options);
        if !options.skip_cache {
            if let Some(mut cached) = self.cache.get(&key) {
                events::cache_hit(&key);
                cached.from_cache = true;
                return Ok(cached);
            }
        }

        let resolved = self.resolve(options);

        let strategy = match explicit {
            Some(strategy) => strategy,
            None => {
                let selection = self
                    .selector
                    .select_strategy(query, &resolved, &self.strategies)
                    .ok_or(WeaveError::NoStrategiesAvailable)?;
                self.strategy_for(selection.strategy)
                    .ok_or(WeaveError::NoStrategiesAvailable)?
            }
        };
        let kind = strategy.kind();

        let mut context = strategy.build(query, &resolved).map_err(|e| {
            events::strategy_failed(kind.as_str(), &e.to_string());
            WeaveError::Strategy(e)
        })?;

        if !options.skip_optimization {
            let _span =
                weave_observability::optimize_span!(context.entries.len(), max_tokens).entered();
            let entries = std::mem::take(&mut context.entries);
            let optimized = self.optimizer.optimize_at(entries, max_tokens, self.clock.now());
            context.replace_entries(optimized);
        } else {
            context.recompute();
        }
        context.strategy = kind;
        context.from_cache = false;

        if !options.skip_cache {
            let ttl = options.cache_ttl_or(self.config.cache.default_ttl_minutes);
            self.cache.put(key, context.clone(), ttl);
        }

        events::context_built(
            kind.as_str(),
            context.entries.len(),
            context.token_count,
            max_tokens,
        );
        Ok(context)
    }

    /// Build with a mandatory strategy atom. `"auto"` and unknown atoms are
    /// rejected with `InvalidStrategy`.
    pub fn build_with_strategy(
        &self,
        query: &str,
        strategy: &str,
        options: &BuildOptions,
    ) -> WeaveResult<BuiltContext> {
        let kind: StrategyKind = strategy.parse()?;
        let options = options.clone().with_strategy(kind);
        self.build_context(query, &options)
    }

    /// Run automatic selection without building.
    pub fn select_strategy(&self, query: &str, options: &BuildOptions) -> Option<Selection> {
        self.selector
            .select_strategy(query, &self.resolve(options), &self.strategies)
    }

    pub fn score_strategies(&self, query: &str, options: &BuildOptions) -> Vec<StrategyScore> {
        self.selector
            .score_strategies(query, &self.resolve(options), &self.strategies)
    }

    fn scorer(&self) -> WeaveResult<&Arc<dyn IContextScorer>> {
        self.scorer.as_ref().ok_or(WeaveError::ScorerUnavailable)
    }

    pub fn evaluate_context(
        &self,
        context: &BuiltContext,
        query: &str,
        options: &BuildOptions,
    ) -> WeaveResult<ScoreResult> {
        self.scorer()?.score(context, query, options)
    }

    /// Score the context with default options, then ask for improvements.
    pub fn get_improvement_suggestions(
        &self,
        context: &BuiltContext,
        query: &str,
    ) -> WeaveResult<Vec<Suggestion>> {
        let scorer = self.scorer()?;
        let score = scorer.score(context, query, &BuildOptions::default())?;
        scorer.suggest_improvements(context, query, &score)
    }

    /// Report observed quality for a context built earlier.
    pub fn provide_feedback(
        &self,
        query: &str,
        context: &BuiltContext,
        quality_score: f64,
        options: &BuildOptions,
    ) -> WeaveResult<()> {
        if !(0.0..=1.0).contains(&quality_score) {
            return Err(WeaveError::InvalidQualityScore {
                score: quality_score,
            });
        }
        self.selector
            .record_feedback(query, &self.resolve(options), context.strategy, quality_score);
        Ok(())
    }

    /// Drop cached contexts. Returns how many entries were removed.
    pub fn invalidate_cache(&self, scope: CacheInvalidation) -> usize {
        match scope {
            CacheInvalidation::Key(key) => usize::from(self.cache.invalidate(&key)),
            CacheInvalidation::User(user_id) => self.cache.invalidate_pattern(&user_id),
            CacheInvalidation::All => {
                let removed = self.cache.len();
                self.cache.clear();
                removed
            }
        }
    }

    /// The key a build with these arguments would be cached under.
    pub fn cache_key(&self, query: &str, options: &BuildOptions) -> String {
        generate_key(query, options)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn selector(&self) -> &AdaptiveSelector {
        &self.selector
    }
}
