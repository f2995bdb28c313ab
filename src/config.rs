use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub recall: RecallPolicy,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    #[serde(default = "default_archive_path")]
    pub path: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: default_archive_path(),
        }
    }
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("./data/archive.json")
}

/// Snapshot cache tuning: how long a per-user corpus snapshot stays fresh
/// and how many recent items one fetch pulls from the archive store.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}
fn default_fetch_limit() -> usize {
    100
}

/// Scoring and ranking policy for the recall engine.
///
/// Every weight, threshold, and limit used by the scorer, ranker, and
/// fallback padder lives here so nothing in the matching path is a magic
/// literal. Defaults reproduce the production tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct RecallPolicy {
    /// Weight of the Jaccard tag-overlap signal.
    #[serde(default = "default_tag_weight")]
    pub tag_weight: f64,
    /// Weight of the binary free-text query match.
    #[serde(default = "default_query_weight")]
    pub query_weight: f64,
    /// Contribution per matched description word.
    #[serde(default = "default_description_word_weight")]
    pub description_word_weight: f64,
    /// At most this many description words count toward the score.
    #[serde(default = "default_max_description_words")]
    pub max_description_words: usize,
    /// Weight of the detected-tool signal.
    #[serde(default = "default_tool_weight")]
    pub tool_weight: f64,
    /// Recency bonus for items younger than the recency window.
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,
    #[serde(default = "default_recency_window_days")]
    pub recency_window_days: i64,
    /// Composite score must strictly exceed this to qualify as a match.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
    /// Upper bound on returned matches.
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,
    /// Below this many matches, the padder backfills from recent items.
    #[serde(default = "default_min_matches")]
    pub min_matches: usize,
    /// Fixed low-confidence score assigned to backfilled items.
    #[serde(default = "default_pad_score")]
    pub pad_score: f64,
    /// Queries longer than this are truncated before scoring.
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,
}

impl Default for RecallPolicy {
    fn default() -> Self {
        Self {
            tag_weight: default_tag_weight(),
            query_weight: default_query_weight(),
            description_word_weight: default_description_word_weight(),
            max_description_words: default_max_description_words(),
            tool_weight: default_tool_weight(),
            recency_weight: default_recency_weight(),
            recency_window_days: default_recency_window_days(),
            score_threshold: default_score_threshold(),
            max_matches: default_max_matches(),
            min_matches: default_min_matches(),
            pad_score: default_pad_score(),
            max_query_len: default_max_query_len(),
        }
    }
}

fn default_tag_weight() -> f64 {
    0.6
}
fn default_query_weight() -> f64 {
    0.3
}
fn default_description_word_weight() -> f64 {
    0.1
}
fn default_max_description_words() -> usize {
    3
}
fn default_tool_weight() -> f64 {
    0.2
}
fn default_recency_weight() -> f64 {
    0.1
}
fn default_recency_window_days() -> i64 {
    7
}
fn default_score_threshold() -> f64 {
    0.1
}
fn default_max_matches() -> usize {
    50
}
fn default_min_matches() -> usize {
    5
}
fn default_pad_score() -> f64 {
    0.05
}
fn default_max_query_len() -> usize {
    100
}

/// Static fallback tags used when a recall request carries no tags of its
/// own (stand-in for an external project-context provider).
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ContextConfig {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

impl Config {
    /// A default configuration for tooling and tests that don't read a
    /// config file.
    pub fn minimal() -> Self {
        Self {
            archive: ArchiveConfig::default(),
            cache: CacheConfig::default(),
            recall: RecallPolicy::default(),
            context: ContextConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let r = &config.recall;

    for (name, value) in [
        ("recall.tag_weight", r.tag_weight),
        ("recall.query_weight", r.query_weight),
        ("recall.description_word_weight", r.description_word_weight),
        ("recall.tool_weight", r.tool_weight),
        ("recall.recency_weight", r.recency_weight),
        ("recall.score_threshold", r.score_threshold),
        ("recall.pad_score", r.pad_score),
    ] {
        if !(0.0..=1.0).contains(&value) {
            anyhow::bail!("{} must be in [0.0, 1.0]", name);
        }
    }

    if r.max_matches < r.min_matches {
        anyhow::bail!("recall.max_matches must be >= recall.min_matches");
    }

    if r.max_query_len < 1 {
        anyhow::bail!("recall.max_query_len must be >= 1");
    }

    if r.recency_window_days < 0 {
        anyhow::bail!("recall.recency_window_days must be >= 0");
    }

    if config.cache.fetch_limit < 1 {
        anyhow::bail!("cache.fetch_limit must be >= 1");
    }

    Ok(())
}
