use super::{
    apply_to_entry, apply_upsert, count_build, select_by_keywords, BlueprintStore, CacheEntry,
    ConflictPolicy, NewCacheEntry, StoreError,
};
use crate::prompt::PromptHash;
use crate::types::CacheId;
use parking_lot::Mutex;
use std::collections::BTreeSet;

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<Vec<CacheEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing set of entries.
    pub fn with_entries(entries: Vec<CacheEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Snapshot of the entry with `id`.
    pub fn get(&self, id: &CacheId) -> Option<CacheEntry> {
        self.entries.lock().iter().find(|e| &e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl BlueprintStore for InMemoryStore {
    async fn upsert(
        &self,
        entry: NewCacheEntry,
        policy: ConflictPolicy,
    ) -> Result<CacheId, StoreError> {
        Ok(apply_upsert(&mut self.entries.lock(), entry, policy))
    }

    async fn find_by_hash(&self, hash: &PromptHash) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .find(|e| &e.prompt_hash == hash)
            .cloned())
    }

    async fn find_by_keywords(
        &self,
        keywords: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<CacheEntry>, StoreError> {
        Ok(select_by_keywords(&self.entries.lock(), keywords, limit))
    }

    async fn increment_usage(&self, id: &CacheId) -> Result<(), StoreError> {
        apply_to_entry(&mut self.entries.lock(), id, |entry| entry.times_used += 1)
    }

    async fn record_build(&self, id: &CacheId, success: bool) -> Result<(), StoreError> {
        apply_to_entry(&mut self.entries.lock(), id, |entry| {
            count_build(entry, success)
        })
    }

    async fn list_entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        Ok(self.entries.lock().clone())
    }
}
