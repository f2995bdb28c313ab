//! Manual capture write path.
//!
//! The full ingestion pipeline (URL fetching, summarization through an
//! external language-model service) lives outside this crate; what ships
//! here is the manual-snippet path the CLI and dev server use. It writes to
//! the JSON archive and invalidates the user's recall cache entry so the
//! next recall sees the new item immediately instead of after TTL expiry.

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use crate::engine::RecallEngine;
use crate::models::{ArchiveItem, Origin};
use crate::store::JsonArchiveStore;

/// Generated summaries keep at most this many characters of the snippet.
const SUMMARY_PREVIEW_CHARS: usize = 100;

/// Tags assigned when the caller supplies none.
const DEFAULT_TAGS: [&str; 2] = ["capture", "manual"];

#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// The snippet text to archive.
    pub input: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
}

/// Build an archive item from a manual capture request.
pub fn build_item(request: &CaptureRequest) -> ArchiveItem {
    let summary = if request.input.chars().count() > SUMMARY_PREVIEW_CHARS {
        let prefix: String = request.input.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        format!("{}...", prefix)
    } else {
        request.input.clone()
    };

    let tags = if request.tags.is_empty() {
        DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
    } else {
        request.tags.iter().map(|t| t.to_lowercase()).collect()
    };

    ArchiveItem {
        id: Uuid::new_v4().to_string(),
        title: request
            .title
            .clone()
            .unwrap_or_else(|| "Manual Capture".to_string()),
        summary,
        tags,
        detected_tools: vec![],
        origin: Origin::Manual,
        timestamp: Utc::now().timestamp_millis(),
    }
}

/// Append a manual capture to the user's archive and invalidate their
/// recall cache entry.
pub fn capture_item(
    store: &JsonArchiveStore,
    engine: &RecallEngine,
    user_id: &str,
    request: &CaptureRequest,
) -> Result<ArchiveItem> {
    let item = build_item(request);
    store.append(user_id, item.clone())?;
    engine.invalidate(user_id);

    tracing::info!(user = user_id, item = %item.id, title = %item.title, "captured manual item");
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let item = build_item(&CaptureRequest {
            input: "A short note about ownership".to_string(),
            title: None,
            tags: vec![],
        });

        assert!(!item.id.is_empty());
        assert_eq!(item.title, "Manual Capture");
        assert_eq!(item.summary, "A short note about ownership");
        assert_eq!(item.tags, vec!["capture", "manual"]);
        assert_eq!(item.origin, Origin::Manual);
        assert!(item.timestamp > 0);
    }

    #[test]
    fn long_input_is_previewed() {
        let item = build_item(&CaptureRequest {
            input: "x".repeat(250),
            title: Some("Long".to_string()),
            tags: vec![],
        });

        assert_eq!(item.summary.chars().count(), SUMMARY_PREVIEW_CHARS + 3);
        assert!(item.summary.ends_with("..."));
    }

    #[test]
    fn caller_tags_are_lowercased() {
        let item = build_item(&CaptureRequest {
            input: "note".to_string(),
            title: None,
            tags: vec!["Rust".to_string(), "CLI".to_string()],
        });

        assert_eq!(item.tags, vec!["rust", "cli"]);
    }
}
