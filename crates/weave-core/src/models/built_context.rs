//! BuiltContext — the assembled result handed back to callers and cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::{ContextEntry, Metadata};
use super::strategy::StrategyKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltContext {
    pub entries: Vec<ContextEntry>,
    pub metadata: Metadata,
    /// Sum of entry token counts.
    pub token_count: usize,
    /// Strategy that produced the raw entries.
    pub strategy: StrategyKind,
    /// Contributing source names in first-seen order.
    pub sources: Vec<String>,
    pub system_prompt: Option<String>,
    /// Set when served from the cache rather than freshly built.
    pub from_cache: bool,
    pub built_at: DateTime<Utc>,
}

impl BuiltContext {
    pub fn from_entries(strategy: StrategyKind, entries: Vec<ContextEntry>) -> Self {
        let mut context = Self {
            entries,
            metadata: Metadata::new(),
            token_count: 0,
            strategy,
            sources: Vec::new(),
            system_prompt: None,
            from_cache: false,
            built_at: Utc::now(),
        };
        context.recompute();
        context
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Replace the entries, refreshing the derived token count and sources.
    pub fn replace_entries(&mut self, entries: Vec<ContextEntry>) {
        self.entries = entries;
        self.recompute();
    }

    /// Refresh `token_count` and `sources` from the entries.
    pub fn recompute(&mut self) {
        self.token_count = self.entries.iter().map(|e| e.token_count).sum();
        self.sources.clear();
        for entry in &self.entries {
            if !self.sources.contains(&entry.source) {
                self.sources.push(entry.source.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries joined by blank lines, prefixed by the system prompt when present.
    pub fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.entries.len() + 1);
        if let Some(prompt) = &self.system_prompt {
            parts.push(prompt.clone());
        }
        parts.extend(self.entries.iter().map(ContextEntry::render));
        parts.join("\n\n")
    }
}
