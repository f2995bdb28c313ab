//! Ranking and fallback padding.
//!
//! Sorts qualifying matches by relevance, truncates to the configured
//! ceiling, and backfills thin result sets with recent archive items so the
//! caller never renders a bare empty state while the archive has anything in
//! it at all. Backfilled entries carry a fixed low score and a distinct
//! reason string so they are visibly lower-confidence than genuine matches.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::RecallPolicy;
use crate::models::{ArchiveItem, RecallMatch};
use crate::reason::match_reason;
use crate::score::ScoredItem;

/// Reason attached to every backfilled entry.
pub const PAD_REASON: &str = "Surfaced from recent archive stream";

/// Denormalize an archive item into a presentable match.
fn to_match(item: &ArchiveItem, match_reason: String, relevance_score: f64) -> RecallMatch {
    RecallMatch {
        archive_item_id: item.id.clone(),
        title: item.title.clone(),
        summary: item.summary.clone(),
        url: item.origin.url().map(String::from),
        source: item.origin.label().to_string(),
        tags: item.tags.clone(),
        match_reason,
        relevance_score,
    }
}

/// Sort, truncate, and pad one recall call's qualifying matches.
///
/// The sort is stable, so items with equal scores keep the scorer's input
/// order. Padding draws from `archive` (the full snapshot) by descending
/// timestamp, skipping items already present, until the floor is reached or
/// the archive is exhausted.
pub fn rank_matches(
    scored: Vec<ScoredItem<'_>>,
    context_tags: &[String],
    archive: &[ArchiveItem],
    policy: &RecallPolicy,
) -> Vec<RecallMatch> {
    let mut matches: Vec<RecallMatch> = scored
        .iter()
        .map(|s| {
            let reason = match_reason(context_tags, s.item, s.kind, s.detail.as_deref());
            to_match(s.item, reason, s.score)
        })
        .collect();

    matches.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });

    if matches.len() < policy.min_matches {
        let existing: HashSet<String> = matches
            .iter()
            .map(|m| m.archive_item_id.clone())
            .collect();

        let mut recent: Vec<&ArchiveItem> = archive.iter().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        for item in recent {
            if matches.len() >= policy.min_matches {
                break;
            }
            if existing.contains(&item.id) {
                continue;
            }
            matches.push(to_match(item, PAD_REASON.to_string(), policy.pad_score));
        }
    }

    matches.truncate(policy.max_matches);
    matches
}
