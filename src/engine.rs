//! Recall orchestration.
//!
//! [`RecallEngine`] is the engine's public entry point. It composes the
//! snapshot cache, scorer, reason generator, and ranker into one call:
//! resolve the user's corpus, sanitize the query, score every item, rank
//! and pad, and assemble the response with a human-readable explanation.
//!
//! The archive-read collaborator is injected at construction, so tests run
//! the engine over stub stores and the production wiring plugs in the real
//! one. A recall call has no side effects beyond the cache's own
//! read-populate behavior.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;

use crate::cache::SnapshotCache;
use crate::config::{CacheConfig, Config, RecallPolicy};
use crate::models::{ContextQuery, RecallResponse};
use crate::rank::rank_matches;
use crate::score::score_archive;
use crate::store::{ArchiveStore, JsonArchiveStore};

pub struct RecallEngine {
    store: Arc<dyn ArchiveStore>,
    cache: SnapshotCache,
    policy: RecallPolicy,
}

impl RecallEngine {
    pub fn new(store: Arc<dyn ArchiveStore>, cache: &CacheConfig, policy: RecallPolicy) -> Self {
        Self {
            store,
            cache: SnapshotCache::new(cache.ttl_secs, cache.fetch_limit),
            policy,
        }
    }

    /// Standard wiring over the configured JSON archive file.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(JsonArchiveStore::new(config.archive.path.clone()));
        Self::new(store, &config.cache, config.recall.clone())
    }

    /// Match the user's archive against the current context.
    pub async fn recall(
        &self,
        user_id: &str,
        context: &ContextQuery,
    ) -> Result<RecallResponse> {
        let items = self.cache.snapshot(user_id, self.store.as_ref()).await?;

        tracing::info!(
            user = user_id,
            tags = ?context.context_tags,
            query = ?context.query,
            archive_count = items.len(),
            "recall with context started"
        );

        let query = sanitize_query(context.query.as_deref(), self.policy.max_query_len);
        let now_ms = Utc::now().timestamp_millis();

        let scored = score_archive(
            &items,
            &context.context_tags,
            query.as_deref(),
            context.description.as_deref(),
            now_ms,
            &self.policy,
        );
        let matches = rank_matches(scored, &context.context_tags, &items, &self.policy);

        let explanation =
            build_explanation(matches.len(), &context.context_tags, query.as_deref());

        Ok(RecallResponse {
            matches,
            explanation,
            timestamp: now_ms,
        })
    }

    /// Drop the user's cached snapshot. Called by the write path after a
    /// new capture so the next recall sees it.
    pub fn invalidate(&self, user_id: &str) {
        self.cache.invalidate(user_id);
    }
}

/// Trim the query and cap its length; over-long input is a warning, not an
/// error. Returns `None` when there is no usable query text.
fn sanitize_query(query: Option<&str>, max_len: usize) -> Option<String> {
    let trimmed = query?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let len = trimmed.chars().count();
    if len > max_len {
        tracing::warn!(query_len = len, max_len, "query too long, truncating");
        Some(trimmed.chars().take(max_len).collect())
    } else {
        Some(trimmed.to_string())
    }
}

fn build_explanation(match_count: usize, context_tags: &[String], query: Option<&str>) -> String {
    if match_count == 0 {
        return "No relevant items found in archive for this context.".to_string();
    }

    let mut signals = Vec::new();
    if !context_tags.is_empty() {
        signals.push(context_tags.join(", "));
    }
    if let Some(q) = query {
        signals.push(format!("query \"{}\"", q));
    }

    if signals.is_empty() {
        format!("Found {} relevant items.", match_count)
    } else {
        format!(
            "Found {} relevant items based on {}.",
            match_count,
            signals.join(" and ")
        )
    }
}
