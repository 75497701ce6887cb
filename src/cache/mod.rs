//! Three-tier blueprint cache.
//!
//! Lookups consult, in order, the in-process memory tier, the persistent
//! store by exact prompt hash, and finally the store's keyword candidates
//! scored for similarity. The first tier that answers wins.
//!
//! The cache never fails its caller: a store error turns a lookup into a
//! miss and a write into "not cached", and usage counters travel through a
//! fire-and-forget [`UsageChannel`].

mod memory;
mod usage;

pub use memory::{MemoryHit, MemoryTier};
pub use usage::UsageChannel;

use crate::analytics::CacheAnalytics;
use crate::config::CacheSettings;
use crate::model::Blueprint;
use crate::prompt::{categorize, normalize, KeywordTaxonomy, PromptHash, SimilarityScorer};
use crate::store::{BlueprintStore, CacheEntry, ConflictPolicy, NewCacheEntry, StoreError};
use crate::types::CacheId;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Where a resolved blueprint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheSource {
    Cache,
    Generated,
}

/// The tier that answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    Memory,
    Exact,
    Keyword,
}

/// Outcome of [`BlueprintCache::find_cached_blueprint`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheLookup {
    pub found: bool,
    pub blueprint: Option<Blueprint>,
    pub cache_id: Option<CacheId>,
    pub similarity: Option<f64>,
    pub source: CacheSource,
    pub tier: Option<CacheTier>,
}

impl CacheLookup {
    fn hit(blueprint: Blueprint, cache_id: CacheId, similarity: f64, tier: CacheTier) -> Self {
        Self {
            found: true,
            blueprint: Some(blueprint),
            cache_id: Some(cache_id),
            similarity: Some(similarity),
            source: CacheSource::Cache,
            tier: Some(tier),
        }
    }

    /// The caller must generate a blueprint and cache it.
    pub fn miss() -> Self {
        Self {
            found: false,
            blueprint: None,
            cache_id: None,
            similarity: None,
            source: CacheSource::Generated,
            tier: None,
        }
    }
}

pub struct BlueprintCache {
    store: Arc<dyn BlueprintStore>,
    memory: Mutex<MemoryTier>,
    settings: CacheSettings,
    taxonomy: &'static KeywordTaxonomy,
    usage: UsageChannel,
}

impl BlueprintCache {
    /// Creates a cache over `store`. Spawns the usage task, so it must be
    /// called inside a tokio runtime.
    pub fn new(store: Arc<dyn BlueprintStore>, settings: CacheSettings) -> Self {
        let memory = MemoryTier::new(settings.memory_capacity, settings.memory_ttl);
        let usage = UsageChannel::spawn(store.clone());
        Self {
            store,
            memory: Mutex::new(memory),
            settings,
            taxonomy: KeywordTaxonomy::standard(),
            usage,
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn BlueprintStore> {
        &self.store
    }

    /// Looks `prompt` up with the configured similarity threshold.
    pub async fn find_cached_blueprint(&self, prompt: &str) -> CacheLookup {
        self.find_with_threshold(prompt, self.settings.min_similarity)
            .await
    }

    pub async fn find_with_threshold(&self, prompt: &str, min_similarity: f64) -> CacheLookup {
        let normalized = normalize(prompt);
        if normalized.is_empty() {
            return CacheLookup::miss();
        }
        let hash = PromptHash::of_normalized(&normalized);

        let memory_hit = self.memory.lock().get(&hash, &normalized);
        if let Some(hit) = memory_hit {
            log::info!("Memory cache hit for '{}'", preview(prompt));
            return self.hit(hit.blueprint, hit.cache_id, 1.0, CacheTier::Memory);
        }

        match self.store.find_by_hash(&hash).await {
            Ok(Some(entry)) if entry.prompt_normalized == normalized => {
                log::info!("Exact cache hit for '{}'", preview(prompt));
                return self.remember(hash, normalized, entry, 1.0, CacheTier::Exact);
            }
            Ok(Some(entry)) => {
                log::debug!(
                    "Prompt hash {} collides: stored '{}', queried '{}'",
                    hash,
                    entry.prompt_normalized,
                    normalized
                );
            }
            Ok(None) => {}
            Err(e) => {
                // the keyword tier reads the same store; no second attempt
                log::warn!("Cache lookup failed, treating as miss: {}", e);
                return CacheLookup::miss();
            }
        }

        let keywords = self.taxonomy.extract(prompt);
        if keywords.is_empty() {
            log::info!("No cache match for '{}' (no keywords)", preview(prompt));
            return CacheLookup::miss();
        }

        let candidates = match self
            .store
            .find_by_keywords(&keywords, self.settings.candidate_limit)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Keyword candidate query failed, treating as miss: {}", e);
                return CacheLookup::miss();
            }
        };

        match self.best_candidate(prompt, candidates) {
            Some((entry, score)) if score >= min_similarity => {
                log::info!(
                    "Similar blueprint '{}' found ({:.1}% match)",
                    entry.template_title,
                    score * 100.0
                );
                self.remember(hash, normalized, entry, score, CacheTier::Keyword)
            }
            Some((entry, score)) => {
                log::debug!(
                    "Best candidate '{}' scored {:.3}, below {:.3}",
                    entry.template_title,
                    score,
                    min_similarity
                );
                CacheLookup::miss()
            }
            None => {
                log::info!("No cache match for '{}'", preview(prompt));
                CacheLookup::miss()
            }
        }
    }

    /// Highest-scoring candidate; the earliest wins among equal scores.
    fn best_candidate(
        &self,
        prompt: &str,
        candidates: Vec<CacheEntry>,
    ) -> Option<(CacheEntry, f64)> {
        let scorer = SimilarityScorer::new(self.taxonomy, self.settings.weights);
        let mut best: Option<(CacheEntry, f64)> = None;
        for candidate in candidates {
            let score = scorer.score(prompt, &candidate.prompt_original);
            if best.as_ref().map_or(true, |(_, top)| score > *top) {
                best = Some((candidate, score));
            }
        }
        best
    }

    /// Serves `entry` and keeps it in the memory tier under the queried
    /// prompt, so a repeat of the same prompt skips the store.
    fn remember(
        &self,
        hash: PromptHash,
        normalized: String,
        entry: CacheEntry,
        similarity: f64,
        tier: CacheTier,
    ) -> CacheLookup {
        self.memory
            .lock()
            .put(hash, normalized, entry.blueprint.clone(), entry.id.clone());
        self.hit(entry.blueprint, entry.id, similarity, tier)
    }

    fn hit(
        &self,
        blueprint: Blueprint,
        cache_id: CacheId,
        similarity: f64,
        tier: CacheTier,
    ) -> CacheLookup {
        self.usage.record_hit(cache_id.clone());
        CacheLookup::hit(blueprint, cache_id, similarity, tier)
    }

    /// Stores a freshly generated blueprint for reuse.
    ///
    /// An existing entry for the same prompt hash is kept as is. Returns
    /// `None` when the blueprint is invalid or the store rejects the write.
    pub async fn cache_blueprint(
        &self,
        prompt: &str,
        blueprint: &Blueprint,
        user_id: Option<&str>,
    ) -> Option<CacheId> {
        let normalized = normalize(prompt);
        if normalized.is_empty() {
            log::warn!("Not caching blueprint '{}': empty prompt", blueprint.title);
            return None;
        }
        if let Err(e) = blueprint.validate() {
            log::warn!("Not caching invalid blueprint '{}': {}", blueprint.title, e);
            return None;
        }

        let keywords = self.taxonomy.extract(prompt);
        let entry = NewCacheEntry {
            prompt_hash: PromptHash::of_normalized(&normalized),
            prompt_original: prompt.to_string(),
            prompt_normalized: normalized,
            category: categorize(&keywords).to_string(),
            keywords,
            blueprint: blueprint.clone(),
            created_by: user_id.map(str::to_string),
            successful_builds: 0,
        };

        match self.insert(entry, ConflictPolicy::IgnoreDuplicate).await {
            Ok(id) => {
                log::info!("Blueprint cached: '{}' (ID: {})", blueprint.title, id);
                Some(id)
            }
            Err(e) => {
                log::warn!("Failed to cache blueprint '{}': {}", blueprint.title, e);
                None
            }
        }
    }

    /// Upserts a prepared entry.
    ///
    /// An overwrite also replaces the memory tier copy. Under
    /// `IgnoreDuplicate` the stored blueprint may be an earlier one, so the
    /// memory tier is left for the next lookup to fill.
    pub async fn insert(
        &self,
        entry: NewCacheEntry,
        policy: ConflictPolicy,
    ) -> Result<CacheId, StoreError> {
        let hash = entry.prompt_hash.clone();
        let normalized = entry.prompt_normalized.clone();
        let blueprint = entry.blueprint.clone();
        let id = self.store.upsert(entry, policy).await?;

        if policy == ConflictPolicy::Overwrite {
            self.memory.lock().put(hash, normalized, blueprint, id.clone());
        }
        Ok(id)
    }

    /// Records a build outcome. Returns immediately; failures are only logged.
    pub fn update_cache_stats(&self, cache_id: &CacheId, success: bool) {
        self.usage.record_build(cache_id.clone(), success);
    }

    pub async fn get_cache_analytics(&self) -> Option<CacheAnalytics> {
        match self.store.list_entries().await {
            Ok(entries) => Some(CacheAnalytics::from_entries(&entries)),
            Err(e) => {
                log::warn!("Failed to read cache analytics: {}", e);
                None
            }
        }
    }

    /// Waits for queued usage updates to reach the store.
    pub async fn flush(&self) {
        self.usage.flush().await;
    }

    /// Canonical keywords of `prompt` under this cache's taxonomy.
    pub fn keywords(&self, prompt: &str) -> BTreeSet<String> {
        self.taxonomy.extract(prompt)
    }

    /// Drops every memory tier entry.
    pub fn clear_memory(&self) {
        self.memory.lock().clear();
    }
}

fn preview(prompt: &str) -> String {
    prompt.chars().take(30).collect()
}
