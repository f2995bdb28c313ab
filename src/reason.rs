//! Human-readable match justifications.
//!
//! Turns the scorer's dominant-signal label into the short reason string
//! shown next to each recall match. Comparison is case-insensitive
//! throughout; context tags are lowercased here even though item tags are
//! assumed already lowercase.

use crate::models::ArchiveItem;
use crate::score::MatchKind;

/// How many overlapping tags a tag-dominant reason names at most.
const MAX_REASON_TAGS: usize = 3;

/// Build the reason string for one match.
///
/// `detail` carries the matched query text for keyword matches and the
/// matched tool name for tool matches; it is ignored for the other kinds.
pub fn match_reason(
    context_tags: &[String],
    item: &ArchiveItem,
    kind: MatchKind,
    detail: Option<&str>,
) -> String {
    let lower_context: Vec<String> = context_tags.iter().map(|t| t.to_lowercase()).collect();
    let matching: Vec<&str> = item
        .tags
        .iter()
        .filter(|t| lower_context.contains(&t.to_lowercase()))
        .map(String::as_str)
        .collect();

    match kind {
        MatchKind::Tag => format!(
            "Matches {} tags: {}",
            matching.len(),
            matching
                .iter()
                .take(MAX_REASON_TAGS)
                .map(|t| t.to_uppercase())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        MatchKind::Keyword => format!(
            "Contains keyword '{}' in summary",
            detail.unwrap_or_default()
        ),
        MatchKind::Tool => format!(
            "References detected tool: {}",
            detail.unwrap_or_default()
        ),
        MatchKind::Hybrid => {
            if matching.is_empty() {
                "Relevance inferred from context overlap".to_string()
            } else {
                format!("Matches tags: {}", matching.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Origin;

    fn item(tags: &[&str]) -> ArchiveItem {
        ArchiveItem {
            id: "x".to_string(),
            title: "React Hooks Guide".to_string(),
            summary: "useState, useEffect, custom hooks".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            detected_tools: vec![],
            origin: Origin::Manual,
            timestamp: 0,
        }
    }

    fn ctx(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn tag_reason_counts_and_uppercases() {
        let reason = match_reason(
            &ctx(&["react", "hooks"]),
            &item(&["react", "javascript", "hooks"]),
            MatchKind::Tag,
            None,
        );
        assert_eq!(reason, "Matches 2 tags: REACT, HOOKS");
    }

    #[test]
    fn tag_reason_names_at_most_three() {
        let reason = match_reason(
            &ctx(&["a", "b", "c", "d"]),
            &item(&["a", "b", "c", "d"]),
            MatchKind::Tag,
            None,
        );
        assert_eq!(reason, "Matches 4 tags: A, B, C");
    }

    #[test]
    fn tag_reason_is_case_insensitive() {
        let reason = match_reason(
            &ctx(&["React"]),
            &item(&["react"]),
            MatchKind::Tag,
            None,
        );
        assert!(reason.contains("REACT"));
    }

    #[test]
    fn keyword_reason_names_the_query() {
        let reason = match_reason(&[], &item(&[]), MatchKind::Keyword, Some("generics"));
        assert_eq!(reason, "Contains keyword 'generics' in summary");
    }

    #[test]
    fn tool_reason_names_the_tool() {
        let reason = match_reason(&[], &item(&[]), MatchKind::Tool, Some("react"));
        assert_eq!(reason, "References detected tool: react");
    }

    #[test]
    fn hybrid_reason_lists_overlap_or_falls_back() {
        let with_overlap = match_reason(
            &ctx(&["react"]),
            &item(&["react", "javascript"]),
            MatchKind::Hybrid,
            None,
        );
        assert_eq!(with_overlap, "Matches tags: react");

        let without = match_reason(&ctx(&["python"]), &item(&["react"]), MatchKind::Hybrid, None);
        assert_eq!(without, "Relevance inferred from context overlap");
    }
}
