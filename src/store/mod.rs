//! Persistent blueprint cache store, the system of record behind the cache tiers.
//!
//! The store is a collaborator: anything offering keyed upsert, point
//! lookup, keyword-filtered listing and counter increments can back the
//! cache. Two implementations ship with the crate, an in-process one and a
//! JSON file on disk.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::model::Blueprint;
use crate::prompt::PromptHash;
use crate::types::CacheId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Failures of the persistent store. The cache swallows all of these.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cache entry {0} not found")]
    NotFound(CacheId),

    #[error("Store IO error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Store document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// What an upsert does when an entry with the same prompt hash exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Replace the stored blueprint and metadata, keeping id and counters.
    Overwrite,
    /// Keep the stored entry untouched; first writer wins.
    IgnoreDuplicate,
}

/// A persisted blueprint keyed by its prompt fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: CacheId,
    pub prompt_hash: PromptHash,
    pub prompt_original: String,
    pub prompt_normalized: String,
    pub keywords: BTreeSet<String>,
    pub blueprint: Blueprint,
    pub template_title: String,
    pub category: String,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub times_used: u64,
    #[serde(default)]
    pub successful_builds: u64,
    #[serde(default)]
    pub failed_builds: u64,
    #[serde(default)]
    pub avg_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// The write half of a cache entry, before the store assigns id and counters.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCacheEntry {
    pub prompt_hash: PromptHash,
    pub prompt_original: String,
    pub prompt_normalized: String,
    pub keywords: BTreeSet<String>,
    pub blueprint: Blueprint,
    pub category: String,
    pub created_by: Option<String>,
    /// Starting value of the successful build counter (seeded entries start at 1).
    pub successful_builds: u64,
}

impl NewCacheEntry {
    /// Materializes the entry with a fresh id and zeroed usage counters.
    pub fn into_entry(self) -> CacheEntry {
        CacheEntry {
            id: CacheId::new_v4(),
            template_title: self.blueprint.title.clone(),
            prompt_hash: self.prompt_hash,
            prompt_original: self.prompt_original,
            prompt_normalized: self.prompt_normalized,
            keywords: self.keywords,
            blueprint: self.blueprint,
            category: self.category,
            created_by: self.created_by,
            times_used: 0,
            successful_builds: self.successful_builds,
            failed_builds: 0,
            avg_rating: 0.0,
            created_at: Utc::now(),
        }
    }
}

impl CacheEntry {
    /// Replaces content fields from `update`, keeping identity and counters.
    pub(crate) fn overwrite_with(&mut self, update: NewCacheEntry) {
        self.template_title = update.blueprint.title.clone();
        self.prompt_original = update.prompt_original;
        self.prompt_normalized = update.prompt_normalized;
        self.keywords = update.keywords;
        self.blueprint = update.blueprint;
        self.category = update.category;
        self.created_by = update.created_by;
    }

    pub(crate) fn shares_keyword(&self, keywords: &BTreeSet<String>) -> bool {
        !self.keywords.is_disjoint(keywords)
    }
}

/// The four capabilities the blueprint cache needs from a persistent store,
/// plus a full listing for analytics.
#[async_trait::async_trait]
pub trait BlueprintStore: Send + Sync {
    /// Inserts or resolves the entry for `entry.prompt_hash`, returning its id.
    async fn upsert(
        &self,
        entry: NewCacheEntry,
        policy: ConflictPolicy,
    ) -> Result<CacheId, StoreError>;

    async fn find_by_hash(&self, hash: &PromptHash) -> Result<Option<CacheEntry>, StoreError>;

    /// Entries whose keyword set intersects `keywords`, most used first,
    /// at most `limit` of them. Equal usage keeps insertion order.
    async fn find_by_keywords(
        &self,
        keywords: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<CacheEntry>, StoreError>;

    async fn increment_usage(&self, id: &CacheId) -> Result<(), StoreError>;

    async fn record_build(&self, id: &CacheId, success: bool) -> Result<(), StoreError>;

    async fn list_entries(&self) -> Result<Vec<CacheEntry>, StoreError>;
}

/// Shared selection logic for stores that hold their entries in a Vec.
pub(crate) fn select_by_keywords(
    entries: &[CacheEntry],
    keywords: &BTreeSet<String>,
    limit: usize,
) -> Vec<CacheEntry> {
    let mut matches: Vec<&CacheEntry> = entries
        .iter()
        .filter(|entry| entry.shares_keyword(keywords))
        .collect();
    // stable sort keeps insertion order among equals
    matches.sort_by(|a, b| b.times_used.cmp(&a.times_used));
    matches.into_iter().take(limit).cloned().collect()
}

/// Applies an upsert to a Vec of entries.
pub(crate) fn apply_upsert(
    entries: &mut Vec<CacheEntry>,
    entry: NewCacheEntry,
    policy: ConflictPolicy,
) -> CacheId {
    match entries
        .iter_mut()
        .find(|existing| existing.prompt_hash == entry.prompt_hash)
    {
        Some(existing) => {
            if policy == ConflictPolicy::Overwrite {
                existing.overwrite_with(entry);
            }
            existing.id.clone()
        }
        None => {
            let created = entry.into_entry();
            let id = created.id.clone();
            entries.push(created);
            id
        }
    }
}

/// Applies a counter update to the entry with `id`.
pub(crate) fn apply_to_entry(
    entries: &mut [CacheEntry],
    id: &CacheId,
    update: impl FnOnce(&mut CacheEntry),
) -> Result<(), StoreError> {
    let entry = entries
        .iter_mut()
        .find(|entry| &entry.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))?;
    update(entry);
    Ok(())
}

pub(crate) fn count_build(entry: &mut CacheEntry, success: bool) {
    if success {
        entry.successful_builds += 1;
    } else {
        entry.failed_builds += 1;
    }
}
