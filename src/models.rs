//! Core data models used throughout Memoria.
//!
//! These types represent the archived knowledge items, recall requests, and
//! scored matches that flow through the recall engine.

use serde::{Deserialize, Serialize};

/// Where an archived item came from.
///
/// Captured as a tagged variant so "has a source URL" vs. "is manual text"
/// is enforced by the type system. Serializes into a `source` discriminator
/// plus the variant's own fields, so a URL capture flattens to
/// `{ "source": "url", "url": "https://..." }` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum Origin {
    /// Pasted snippet or note, no canonical location.
    Manual,
    /// Captured from the web; `url` is the canonical source location.
    Url { url: String },
    /// Pulled in from an external feed (e.g. a news aggregator).
    ExternalFeed,
    /// Imported from a code-hosting account.
    CodeHost,
}

impl Origin {
    /// The canonical source URL, if this origin carries one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Origin::Url { url } => Some(url),
            _ => None,
        }
    }

    /// The wire label for this origin (`"manual"`, `"url"`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            Origin::Manual => "manual",
            Origin::Url { .. } => "url",
            Origin::ExternalFeed => "external-feed",
            Origin::CodeHost => "code-host",
        }
    }
}

/// A previously captured knowledge unit.
///
/// Created once by the capture pipeline and never mutated by the recall
/// engine. Collections default to empty and `timestamp` defaults to 0 so
/// that partially populated records degrade gracefully instead of failing
/// deserialization (a zero timestamp is old enough to never earn the
/// recency boost).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Lowercase topic labels; order is irrelevant.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Specific technology/tool names mentioned in the content.
    #[serde(default)]
    pub detected_tools: Vec<String>,
    #[serde(flatten)]
    pub origin: Origin,
    /// Creation instant, epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

/// One recall request's input: what the user is currently working on.
#[derive(Debug, Clone, Default)]
pub struct ContextQuery {
    /// Lowercase tags describing the current focus (may be empty).
    pub context_tags: Vec<String>,
    /// Free-text project description.
    pub description: Option<String>,
    /// Free-text search phrase; the orchestrator truncates over-long input.
    pub query: Option<String>,
}

/// One scored, annotated item in a recall result.
///
/// Fields are denormalized from the source [`ArchiveItem`] for presentation.
/// Within one result set, matches are ordered by `relevance_score` descending
/// and each archive item appears at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallMatch {
    pub archive_item_id: String,
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
    pub tags: Vec<String>,
    /// Human-readable explanation of why the item surfaced.
    pub match_reason: String,
    /// Composite relevance in [0, 1]; higher is more relevant.
    pub relevance_score: f64,
}

/// The assembled result of one recall call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallResponse {
    pub matches: Vec<RecallMatch>,
    /// States how many items matched and which context signals drove them.
    pub explanation: String,
    /// When recall executed, epoch milliseconds.
    pub timestamp: i64,
}
