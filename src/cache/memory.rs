//! Bounded, time-boxed in-process tier keyed by prompt hash.
//!
//! Each entry also keeps the normalized prompt it was stored for; a lookup
//! whose prompt differs (a hash collision) is a miss.

use crate::model::Blueprint;
use crate::prompt::PromptHash;
use crate::types::CacheId;
use lru::LruCache;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct MemoryEntry {
    prompt: String,
    blueprint: Blueprint,
    cache_id: CacheId,
    stored_at: Instant,
}

/// A hit from the memory tier.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryHit {
    pub blueprint: Blueprint,
    pub cache_id: CacheId,
}

/// Fixed-capacity LRU map with a sliding time-to-live per entry.
///
/// Recency order is tracked by the underlying `LruCache`; capacity is
/// enforced here by [`MemoryTier::evict_if_needed`] so the eviction step is
/// a named operation rather than a side effect of insertion.
pub struct MemoryTier {
    entries: LruCache<PromptHash, MemoryEntry>,
    capacity: usize,
    ttl: Duration,
}

impl MemoryTier {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::unbounded(),
            capacity,
            ttl,
        }
    }

    pub fn get(&mut self, hash: &PromptHash, normalized: &str) -> Option<MemoryHit> {
        self.get_at(hash, normalized, Instant::now())
    }

    /// Looks up `hash` as of `now`. Expired entries are dropped; live ones
    /// become most recently used and get their timestamp refreshed.
    pub(crate) fn get_at(
        &mut self,
        hash: &PromptHash,
        normalized: &str,
        now: Instant,
    ) -> Option<MemoryHit> {
        let expired = {
            let entry = self.entries.peek(hash)?;
            if entry.prompt != normalized {
                log::debug!("Memory tier hash {} holds '{}'", hash, entry.prompt);
                return None;
            }
            now.saturating_duration_since(entry.stored_at) > self.ttl
        };
        if expired {
            self.entries.pop(hash);
            return None;
        }

        let entry = self.entries.get_mut(hash)?;
        entry.stored_at = now;
        Some(MemoryHit {
            blueprint: entry.blueprint.clone(),
            cache_id: entry.cache_id.clone(),
        })
    }

    pub fn put(
        &mut self,
        hash: PromptHash,
        normalized: String,
        blueprint: Blueprint,
        cache_id: CacheId,
    ) {
        self.put_at(hash, normalized, blueprint, cache_id, Instant::now());
    }

    pub(crate) fn put_at(
        &mut self,
        hash: PromptHash,
        normalized: String,
        blueprint: Blueprint,
        cache_id: CacheId,
        now: Instant,
    ) {
        if self.capacity == 0 {
            return;
        }
        self.entries.pop(&hash);
        self.evict_if_needed();
        self.entries.put(
            hash,
            MemoryEntry {
                prompt: normalized,
                blueprint,
                cache_id,
                stored_at: now,
            },
        );
    }

    /// Drops least recently used entries until one more fits.
    pub fn evict_if_needed(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() >= self.capacity {
            match self.entries.pop_lru() {
                Some((hash, _)) => {
                    log::debug!("Memory tier evicted {}", hash);
                    evicted += 1;
                }
                None => break,
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
