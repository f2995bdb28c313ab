//! Relevance scoring.
//!
//! Computes a weighted composite score in [0, 1] for one archive item
//! against the caller's current context. Each signal contributes additively:
//!
//! | Signal | Weight | Shape |
//! |--------|--------|-------|
//! | Tag overlap | 0.6 | Jaccard ratio of item tags vs. context tags |
//! | Query match | 0.3 | binary substring of title+summary |
//! | Description words | up to 0.3 | 0.1 per matched word, capped at 3 |
//! | Tool match | 0.2 | any detected tool present in context tags |
//! | Recency | 0.1 | item younger than 7 days |
//!
//! All weights come from [`RecallPolicy`], not literals. An item qualifies
//! only when its composite strictly exceeds the policy threshold. Scoring is
//! a pure function of (item, context, now); ties at equal score keep input
//! order so the later stable sort has a deterministic base.

use crate::config::RecallPolicy;
use crate::models::ArchiveItem;
use std::collections::HashSet;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Which signal dominated a match. Assignment is last-signal-wins in
/// evaluation order (tag, keyword, description, tool), so e.g. an item that
/// overlaps tags and references a context tool is labeled a tool match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Tag,
    Keyword,
    Tool,
    Hybrid,
}

/// A qualifying item together with the scorer's intermediate signals,
/// consumed by the reason generator and the ranker.
#[derive(Debug, Clone)]
pub struct ScoredItem<'a> {
    pub item: &'a ArchiveItem,
    /// Composite relevance, clamped to [0, 1].
    pub score: f64,
    /// Lowercased item tags that also appear in the context tag set.
    pub matched_tags: Vec<String>,
    pub kind: MatchKind,
    /// The matched query (keyword kind) or tool name (tool kind).
    pub detail: Option<String>,
}

/// Score a single item. Returns `None` when the composite does not strictly
/// exceed the policy threshold.
///
/// `query` is expected to be pre-sanitized (trimmed and length-capped) by
/// the orchestrator; comparison here is case-insensitive throughout.
pub fn score_item<'a>(
    item: &'a ArchiveItem,
    context_tags: &[String],
    query: Option<&str>,
    description: Option<&str>,
    now_ms: i64,
    policy: &RecallPolicy,
) -> Option<ScoredItem<'a>> {
    let ctx_tags: Vec<String> = context_tags.iter().map(|t| t.to_lowercase()).collect();
    let item_tags: Vec<String> = item.tags.iter().map(|t| t.to_lowercase()).collect();
    let content = format!("{}{}", item.summary, item.title).to_lowercase();

    let mut score = 0.0;
    let mut kind = MatchKind::Hybrid;
    let mut matched_query: Option<String> = None;

    // Tag overlap: intersection over union of the two tag sets
    let matched_tags: Vec<String> = item_tags
        .iter()
        .filter(|t| ctx_tags.contains(t))
        .cloned()
        .collect();
    if !matched_tags.is_empty() {
        let union: HashSet<&str> = item_tags
            .iter()
            .chain(ctx_tags.iter())
            .map(String::as_str)
            .collect();
        score += (matched_tags.len() as f64 / union.len() as f64) * policy.tag_weight;
        kind = MatchKind::Tag;
    }

    // Free-text query: binary substring match against title+summary
    if let Some(q) = query {
        let lower_query = q.to_lowercase();
        if !lower_query.is_empty() && content.contains(&lower_query) {
            score += policy.query_weight;
            kind = MatchKind::Keyword;
            matched_query = Some(q.to_string());
        }
    }

    // Description keywords: each word longer than 4 chars found in the
    // content adds a small bonus, capped
    if let Some(desc) = description {
        let lower_desc = desc.to_lowercase();
        let found = lower_desc
            .split_whitespace()
            .filter(|w| w.chars().count() > 4)
            .filter(|w| content.contains(*w))
            .count();
        if found > 0 {
            score += policy.description_word_weight
                * found.min(policy.max_description_words) as f64;
            kind = MatchKind::Hybrid;
        }
    }

    // Tool match: any detected tool named in the context tags
    let matched_tool = item
        .detected_tools
        .iter()
        .map(|t| t.to_lowercase())
        .find(|t| ctx_tags.contains(t));
    if matched_tool.is_some() {
        score += policy.tool_weight;
        kind = MatchKind::Tool;
    }

    // Recency boost: a default/absent timestamp (0) is old enough to never
    // qualify
    if now_ms - item.timestamp < policy.recency_window_days * DAY_MS {
        score += policy.recency_weight;
    }

    if score > policy.score_threshold {
        let detail = match kind {
            MatchKind::Keyword => matched_query,
            MatchKind::Tool => matched_tool,
            _ => None,
        };
        Some(ScoredItem {
            item,
            score: score.min(1.0),
            matched_tags,
            kind,
            detail,
        })
    } else {
        None
    }
}

/// Score every item in the snapshot, preserving input order among the
/// qualifiers.
pub fn score_archive<'a>(
    items: &'a [ArchiveItem],
    context_tags: &[String],
    query: Option<&str>,
    description: Option<&str>,
    now_ms: i64,
    policy: &RecallPolicy,
) -> Vec<ScoredItem<'a>> {
    items
        .iter()
        .filter_map(|item| score_item(item, context_tags, query, description, now_ms, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Origin;

    const NOW: i64 = 1_700_000_000_000;
    const OLD: i64 = NOW - 40 * DAY_MS;

    fn item(id: &str, title: &str, summary: &str, tags: &[&str], timestamp: i64) -> ArchiveItem {
        ArchiveItem {
            id: id.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            detected_tools: vec![],
            origin: Origin::Manual,
            timestamp,
        }
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn tag_overlap_is_jaccard_times_weight() {
        let policy = RecallPolicy::default();
        let it = item("1", "React Hooks Guide", "useState and friends", &["react", "javascript", "hooks"], OLD);

        let scored = score_item(&it, &tags(&["react", "javascript"]), None, None, NOW, &policy)
            .expect("should qualify");

        // intersection 2, union 3
        assert!((scored.score - 2.0 / 3.0 * 0.6).abs() < 1e-9);
        assert_eq!(scored.kind, MatchKind::Tag);
        assert_eq!(scored.matched_tags, vec!["react", "javascript"]);
    }

    #[test]
    fn disjoint_tags_do_not_qualify() {
        let policy = RecallPolicy::default();
        let it = item("1", "Python ML", "pandas tricks", &["python", "ml"], OLD);

        assert!(score_item(&it, &tags(&["react", "javascript"]), None, None, NOW, &policy).is_none());
    }

    #[test]
    fn query_match_is_binary_and_case_insensitive() {
        let policy = RecallPolicy::default();
        let it = item("1", "TypeScript Deep Dive", "A tour of Generics and mapped types", &[], OLD);

        let scored = score_item(&it, &[], Some("generics"), None, NOW, &policy)
            .expect("query substring should qualify");
        assert!((scored.score - 0.3).abs() < 1e-9);
        assert_eq!(scored.kind, MatchKind::Keyword);
        assert_eq!(scored.detail.as_deref(), Some("generics"));

        assert!(score_item(&it, &[], Some("borrowck"), None, NOW, &policy).is_none());
    }

    #[test]
    fn description_words_cap_at_three() {
        let policy = RecallPolicy::default();
        let it = item(
            "1",
            "Deployment Handbook",
            "kubernetes ingress monitoring rollback procedures explained",
            &[],
            OLD,
        );

        // Five words over 4 chars all present in the summary, only 3 count
        let desc = "kubernetes ingress monitoring rollback procedures";
        let scored = score_item(&it, &[], None, Some(desc), NOW, &policy).expect("should qualify");
        assert!((scored.score - 0.3).abs() < 1e-9);
        assert_eq!(scored.kind, MatchKind::Hybrid);
    }

    #[test]
    fn single_description_word_does_not_clear_threshold() {
        let policy = RecallPolicy::default();
        let it = item("1", "Notes", "kubernetes only", &[], OLD);

        // 0.1 is not strictly greater than the 0.1 threshold
        assert!(score_item(&it, &[], None, Some("kubernetes"), NOW, &policy).is_none());

        let it2 = item("2", "Notes", "kubernetes ingress", &[], OLD);
        let scored = score_item(&it2, &[], None, Some("kubernetes ingress"), NOW, &policy)
            .expect("two words clear the threshold");
        assert!((scored.score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn short_description_words_are_ignored() {
        let policy = RecallPolicy::default();
        let it = item("1", "Go Notes", "go api and web tips", &[], OLD);

        // every word is <= 4 chars
        assert!(score_item(&it, &[], None, Some("go api web tips"), NOW, &policy).is_none());
    }

    #[test]
    fn tool_match_contributes_and_dominates_kind() {
        let policy = RecallPolicy::default();
        let mut it = item("1", "State of JS", "framework roundup", &["frontend"], OLD);
        it.detected_tools = vec!["React".to_string()];

        let scored = score_item(&it, &tags(&["react"]), None, None, NOW, &policy)
            .expect("tool match should qualify");
        assert!((scored.score - 0.2).abs() < 1e-9);
        assert_eq!(scored.kind, MatchKind::Tool);
        assert_eq!(scored.detail.as_deref(), Some("react"));
    }

    #[test]
    fn recency_alone_does_not_qualify() {
        let policy = RecallPolicy::default();
        let it = item("1", "Fresh but irrelevant", "nothing in common", &[], NOW - DAY_MS);

        assert!(score_item(&it, &tags(&["react"]), None, None, NOW, &policy).is_none());
    }

    #[test]
    fn recency_boosts_fresh_items() {
        let policy = RecallPolicy::default();
        let fresh = item("1", "Guide", "body", &["react"], NOW - DAY_MS);
        let stale = item("2", "Guide", "body", &["react"], OLD);
        let ctx = tags(&["react"]);

        let fresh_score = score_item(&fresh, &ctx, None, None, NOW, &policy).unwrap().score;
        let stale_score = score_item(&stale, &ctx, None, None, NOW, &policy).unwrap().score;
        assert!((fresh_score - stale_score - 0.1).abs() < 1e-9);
    }

    #[test]
    fn absent_timestamp_is_excluded_from_recency() {
        let policy = RecallPolicy::default();
        let it = item("1", "Guide", "body", &["react"], 0);

        let scored = score_item(&it, &tags(&["react"]), None, None, NOW, &policy).unwrap();
        assert!((scored.score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn composite_is_clamped_to_one() {
        let policy = RecallPolicy::default();
        let mut it = item(
            "1",
            "React Performance",
            "react profiling rendering memoization benchmarks explained",
            &["react", "javascript"],
            NOW - DAY_MS,
        );
        it.detected_tools = vec!["react".to_string()];

        let scored = score_item(
            &it,
            &tags(&["react", "javascript"]),
            Some("profiling"),
            Some("profiling rendering memoization benchmarks"),
            NOW,
            &policy,
        )
        .expect("everything matches");
        assert!(scored.score <= 1.0);
        assert!(scored.score >= 0.0);
    }

    #[test]
    fn more_tag_overlap_outscores_less() {
        let policy = RecallPolicy::default();
        let a = item("a", "Full stack guide", "all three", &["react", "typescript", "nodejs"], OLD);
        let b = item("b", "React only", "just react", &["react"], OLD);
        let ctx = tags(&["react", "typescript", "nodejs"]);

        let score_a = score_item(&a, &ctx, None, None, NOW, &policy).unwrap().score;
        let score_b = score_item(&b, &ctx, None, None, NOW, &policy).unwrap().score;
        assert!(score_a > score_b);
    }

    #[test]
    fn score_archive_preserves_input_order() {
        let policy = RecallPolicy::default();
        let items = vec![
            item("first", "Guide A", "body", &["react"], OLD),
            item("second", "Guide B", "body", &["react"], OLD),
            item("third", "Guide C", "body", &["react"], OLD),
        ];

        let scored = score_archive(&items, &tags(&["react"]), None, None, NOW, &policy);
        let ids: Vec<&str> = scored.iter().map(|s| s.item.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
