//! Collaborator interfaces at the engine's boundary.
//!
//! The recall engine consumes two external collaborators through narrow
//! traits: an [`ArchiveStore`] that reads a user's captured items, and an
//! optional [`ContextSource`] that supplies the tags describing what the
//! user is currently working on. Implement these traits to plug in a real
//! document store or a derived-context provider.
//!
//! [`JsonArchiveStore`] ships as the file-backed implementation used by the
//! CLI and the dev server. Its read path implements the trait; its write
//! path (`append`) is an inherent method so the collaborator interface the
//! engine sees stays strictly read-only.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::models::ArchiveItem;

/// Read access to a user's archived items.
///
/// Implementations return at most `limit` items, ordered by `timestamp`
/// descending, already filtered to the requesting user. The engine performs
/// no further authorization.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    async fn fetch_recent(&self, user_id: &str, limit: usize) -> Result<Vec<ArchiveItem>>;
}

/// Supplies the context tags for a user when a request carries none.
///
/// An empty set means "no tag signal", not an error.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn context_tags(&self, user_id: &str) -> Result<Vec<String>>;
}

/// A fixed tag set from configuration, used as the default context source.
pub struct StaticContextSource {
    tags: Vec<String>,
}

impl StaticContextSource {
    pub fn new(tags: Vec<String>) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl ContextSource for StaticContextSource {
    async fn context_tags(&self, _user_id: &str) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }
}

/// File-backed archive keyed by user id.
///
/// Persists a `{ user_id: [ArchiveItem] }` map as pretty-printed JSON. This
/// is the development stand-in for an external document store; a missing
/// file reads as an empty archive.
pub struct JsonArchiveStore {
    path: PathBuf,
}

type ArchiveMap = HashMap<String, Vec<ArchiveItem>>;

impl JsonArchiveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the archive file (and parent directories) if it does not
    /// exist. Idempotent.
    pub fn init(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create archive directory: {}", parent.display())
            })?;
        }
        self.write_all(&ArchiveMap::new())
    }

    fn read_all(&self) -> Result<ArchiveMap> {
        if !self.path.exists() {
            return Ok(ArchiveMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read archive file: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(ArchiveMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed archive file: {}", self.path.display()))
    }

    fn write_all(&self, map: &ArchiveMap) -> Result<()> {
        let content = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write archive file: {}", self.path.display()))
    }

    /// Append one captured item to a user's archive.
    pub fn append(&self, user_id: &str, item: ArchiveItem) -> Result<()> {
        let mut map = self.read_all()?;
        map.entry(user_id.to_string()).or_default().push(item);
        self.write_all(&map)
    }

    /// Total number of items stored for a user.
    pub fn count(&self, user_id: &str) -> Result<usize> {
        Ok(self.read_all()?.get(user_id).map_or(0, Vec::len))
    }
}

#[async_trait]
impl ArchiveStore for JsonArchiveStore {
    async fn fetch_recent(&self, user_id: &str, limit: usize) -> Result<Vec<ArchiveItem>> {
        let mut items = self.read_all()?.remove(user_id).unwrap_or_default();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items.truncate(limit);
        Ok(items)
    }
}
