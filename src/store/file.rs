// src/store/file.rs
//! Disk-backed blueprint store.
//!
//! All entries live in one JSON document. It is read once when the store is
//! opened and rewritten after every mutation through a temp file + rename,
//! so readers never observe a half-written document. A mutation is applied
//! to a copy and only replaces the in-process state once the copy is on
//! disk; a failed write leaves both unchanged.

use super::{
    apply_to_entry, apply_upsert, count_build, select_by_keywords, BlueprintStore, CacheEntry,
    ConflictPolicy, NewCacheEntry, StoreError,
};
use crate::prompt::PromptHash;
use crate::types::CacheId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const STORE_FILE_NAME: &str = "blueprint_cache.json";

#[derive(serde::Serialize, serde::Deserialize, Default, Clone)]
struct StoreDocument {
    entries: Vec<CacheEntry>,
}

/// JSON file store. Mutations are serialized by an async mutex, which makes
/// each upsert atomic with respect to concurrent callers in this process.
pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl JsonFileStore {
    /// Opens (or creates) the store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let document = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => StoreDocument::default(),
            Ok(content) => serde_json::from_str::<StoreDocument>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreDocument::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        log::info!(
            "Opened blueprint store at {} ({} entries)",
            path.display(),
            document.entries.len()
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// Opens the store in `$XDG_CACHE_HOME/notion-blueprint` (or `~/.cache/notion-blueprint`).
    pub async fn open_default() -> Result<Self, StoreError> {
        Self::open(Self::default_path()).await
    }

    pub fn default_path() -> PathBuf {
        std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".cache")
            })
            .join("notion-blueprint")
            .join(STORE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `next` to disk, then makes it the current document.
    async fn commit(
        &self,
        current: &mut StoreDocument,
        next: StoreDocument,
    ) -> Result<(), StoreError> {
        self.persist(&next).await?;
        *current = next;
        Ok(())
    }

    async fn persist(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(document)?;
        let temp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|source| StoreError::Io {
                path: temp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait::async_trait]
impl BlueprintStore for JsonFileStore {
    async fn upsert(
        &self,
        entry: NewCacheEntry,
        policy: ConflictPolicy,
    ) -> Result<CacheId, StoreError> {
        let mut document = self.document.lock().await;
        let mut next = document.clone();
        let id = apply_upsert(&mut next.entries, entry, policy);
        if next.entries.len() != document.entries.len() || policy == ConflictPolicy::Overwrite {
            self.commit(&mut document, next).await?;
        }
        Ok(id)
    }

    async fn find_by_hash(&self, hash: &PromptHash) -> Result<Option<CacheEntry>, StoreError> {
        let document = self.document.lock().await;
        Ok(document
            .entries
            .iter()
            .find(|e| &e.prompt_hash == hash)
            .cloned())
    }

    async fn find_by_keywords(
        &self,
        keywords: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<CacheEntry>, StoreError> {
        let document = self.document.lock().await;
        Ok(select_by_keywords(&document.entries, keywords, limit))
    }

    async fn increment_usage(&self, id: &CacheId) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        let mut next = document.clone();
        apply_to_entry(&mut next.entries, id, |entry| entry.times_used += 1)?;
        self.commit(&mut document, next).await
    }

    async fn record_build(&self, id: &CacheId, success: bool) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        let mut next = document.clone();
        apply_to_entry(&mut next.entries, id, |entry| count_build(entry, success))?;
        self.commit(&mut document, next).await
    }

    async fn list_entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        Ok(self.document.lock().await.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Blueprint, DatabaseSpec, PropertyKind, PropertySpec};
    use crate::prompt::{extract_keywords, normalize};
    use indexmap::IndexMap;

    fn new_entry(prompt: &str) -> NewCacheEntry {
        NewCacheEntry {
            prompt_hash: PromptHash::of(prompt),
            prompt_original: prompt.to_string(),
            prompt_normalized: normalize(prompt),
            keywords: extract_keywords(prompt),
            blueprint: Blueprint {
                title: "Habit Tracker".to_string(),
                description: "Track habits".to_string(),
                icon: Some("✅".to_string()),
                databases: vec![],
                pages: vec![],
            },
            category: "general".to_string(),
            created_by: Some("user-1".to_string()),
            successful_builds: 1,
        }
    }

    #[tokio::test]
    async fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(STORE_FILE_NAME);

        let id = {
            let store = JsonFileStore::open(&path).await.unwrap();
            let id = store
                .upsert(new_entry("habit tracker"), ConflictPolicy::IgnoreDuplicate)
                .await
                .unwrap();
            store.increment_usage(&id).await.unwrap();
            store.record_build(&id, true).await.unwrap();
            id
        };

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let entry = reopened
            .find_by_hash(&PromptHash::of("habit tracker"))
            .await
            .unwrap()
            .expect("entry should be persisted");
        assert_eq!(entry.id, id);
        assert_eq!(entry.times_used, 1);
        assert_eq!(entry.successful_builds, 2);
        assert_eq!(entry.created_by.as_deref(), Some("user-1"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join(STORE_FILE_NAME))
            .await
            .unwrap();
        assert!(store.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        tokio::fs::write(&path, "{ not json").await.unwrap();
        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StoreError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn property_order_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);

        let mut properties = IndexMap::new();
        properties.insert("Name".to_string(), PropertySpec::new(PropertyKind::Title));
        properties.insert(
            "Frequency".to_string(),
            PropertySpec::with_options(PropertyKind::Select, ["Daily", "Weekly"]),
        );
        properties.insert("Done".to_string(), PropertySpec::new(PropertyKind::Checkbox));
        let mut entry = new_entry("habit tracker");
        entry.blueprint.databases.push(DatabaseSpec {
            key: "habits_db".to_string(),
            title: "Habits".to_string(),
            description: None,
            properties,
        });

        JsonFileStore::open(&path)
            .await
            .unwrap()
            .upsert(entry, ConflictPolicy::IgnoreDuplicate)
            .await
            .unwrap();

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let stored = reopened.list_entries().await.unwrap().remove(0);
        let names: Vec<&str> = stored.blueprint.databases[0]
            .properties
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["Name", "Frequency", "Done"]);
    }

    #[tokio::test]
    async fn failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        let store = JsonFileStore::open(&path).await.unwrap();
        let id = store
            .upsert(new_entry("habit tracker"), ConflictPolicy::IgnoreDuplicate)
            .await
            .unwrap();

        // a directory in the temp file's place makes every write fail
        let blocker = path.with_extension("json.tmp");
        std::fs::create_dir(&blocker).unwrap();

        let result = store
            .upsert(new_entry("budget planner"), ConflictPolicy::IgnoreDuplicate)
            .await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(store
            .find_by_hash(&PromptHash::of("budget planner"))
            .await
            .unwrap()
            .is_none());

        assert!(store.increment_usage(&id).await.is_err());
        assert!(store.record_build(&id, true).await.is_err());
        let entry = store.list_entries().await.unwrap().remove(0);
        assert_eq!(entry.times_used, 0);
        assert_eq!(entry.successful_builds, 1);

        std::fs::remove_dir(&blocker).unwrap();
        store.increment_usage(&id).await.unwrap();
        let reopened = JsonFileStore::open(&path).await.unwrap();
        let entries = reopened.list_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].times_used, 1);
    }
}
