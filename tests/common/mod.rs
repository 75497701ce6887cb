// tests/common/mod.rs
//! Recording fakes for the store, the Notion target and the generator.
#![allow(dead_code)]

use indexmap::IndexMap;
use notion_blueprint::{
    AppError, BlockPayload, BlockSpec, Blueprint, BlueprintGenerator, BlueprintStore, CacheEntry,
    CacheId, ConflictPolicy, DatabaseId, DatabaseSpec, InMemoryStore, NewCacheEntry,
    NotionErrorCode, PageId, PageSpec, PromptHash, PropertyKind, PropertySpec, StoreError,
    WorkspaceTarget,
};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub fn blueprint(title: &str) -> Blueprint {
    let mut properties = IndexMap::new();
    properties.insert("Name".to_string(), PropertySpec::new(PropertyKind::Title));
    properties.insert(
        "Status".to_string(),
        PropertySpec::with_options(PropertyKind::Select, ["Todo", "Done"]),
    );
    Blueprint {
        title: title.to_string(),
        description: format!("{title} workspace"),
        icon: Some("✅".to_string()),
        databases: vec![DatabaseSpec {
            key: "tasks_db".to_string(),
            title: "Tasks".to_string(),
            description: None,
            properties,
        }],
        pages: vec![PageSpec {
            title: "Dashboard".to_string(),
            icon: None,
            blocks: vec![BlockSpec::linked_database("tasks_db")],
        }],
    }
}

/// In-memory store that counts calls and can be switched into an outage.
#[derive(Default)]
pub struct CountingStore {
    pub inner: InMemoryStore,
    pub hash_lookups: AtomicUsize,
    pub keyword_queries: AtomicUsize,
    pub upserts: AtomicUsize,
    failing: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Lookups and writes issued so far (usage counters excluded).
    pub fn calls(&self) -> usize {
        self.hash_lookups.load(Ordering::SeqCst)
            + self.keyword_queries.load(Ordering::SeqCst)
            + self.upserts.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl BlueprintStore for CountingStore {
    async fn upsert(
        &self,
        entry: NewCacheEntry,
        policy: ConflictPolicy,
    ) -> Result<CacheId, StoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.upsert(entry, policy).await
    }

    async fn find_by_hash(&self, hash: &PromptHash) -> Result<Option<CacheEntry>, StoreError> {
        self.hash_lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.find_by_hash(hash).await
    }

    async fn find_by_keywords(
        &self,
        keywords: &BTreeSet<String>,
        limit: usize,
    ) -> Result<Vec<CacheEntry>, StoreError> {
        self.keyword_queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.find_by_keywords(keywords, limit).await
    }

    async fn increment_usage(&self, id: &CacheId) -> Result<(), StoreError> {
        self.check()?;
        self.inner.increment_usage(id).await
    }

    async fn record_build(&self, id: &CacheId, success: bool) -> Result<(), StoreError> {
        self.check()?;
        self.inner.record_build(id, success).await
    }

    async fn list_entries(&self) -> Result<Vec<CacheEntry>, StoreError> {
        self.check()?;
        self.inner.list_entries().await
    }
}

/// One call received by [`RecordingTarget`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Page {
        parent: PageId,
        title: String,
        blocks: Vec<BlockPayload>,
    },
    Database {
        parent: PageId,
        title: String,
    },
    Row {
        database: DatabaseId,
        title_property: String,
        title: String,
    },
}

/// Workspace target that hands out fresh ids and records every call.
#[derive(Default)]
pub struct RecordingTarget {
    calls: Mutex<Vec<Call>>,
    failing_titles: Mutex<HashSet<String>>,
    created_databases: Mutex<Vec<DatabaseId>>,
    page_url: Option<String>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page URLs are retrieved as `url`; without one, retrieval fails.
    pub fn with_page_url(url: &str) -> Self {
        Self {
            page_url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Every create call for an object titled `title` fails.
    pub fn fail_on(&self, title: &str) {
        self.failing_titles.lock().insert(title.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn created_databases(&self) -> Vec<DatabaseId> {
        self.created_databases.lock().clone()
    }

    fn check(&self, title: &str) -> Result<(), AppError> {
        if self.failing_titles.lock().contains(title) {
            Err(AppError::NotionService {
                code: NotionErrorCode::ValidationFailed,
                message: format!("{title} rejected"),
                status: 400,
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl WorkspaceTarget for RecordingTarget {
    async fn create_page(
        &self,
        parent: &PageId,
        title: &str,
        _icon: Option<&str>,
        blocks: &[BlockPayload],
    ) -> Result<PageId, AppError> {
        self.check(title)?;
        self.calls.lock().push(Call::Page {
            parent: parent.clone(),
            title: title.to_string(),
            blocks: blocks.to_vec(),
        });
        Ok(PageId::new_v4())
    }

    async fn create_database(
        &self,
        parent: &PageId,
        title: &str,
        _description: Option<&str>,
        _properties: &IndexMap<String, PropertySpec>,
    ) -> Result<DatabaseId, AppError> {
        self.check(title)?;
        self.calls.lock().push(Call::Database {
            parent: parent.clone(),
            title: title.to_string(),
        });
        let id = DatabaseId::new_v4();
        self.created_databases.lock().push(id.clone());
        Ok(id)
    }

    async fn create_row(
        &self,
        database: &DatabaseId,
        title_property: &str,
        title: &str,
        _blocks: &[BlockPayload],
    ) -> Result<PageId, AppError> {
        self.check(title)?;
        self.calls.lock().push(Call::Row {
            database: database.clone(),
            title_property: title_property.to_string(),
            title: title.to_string(),
        });
        Ok(PageId::new_v4())
    }

    async fn retrieve_page_url(&self, _page: &PageId) -> Result<String, AppError> {
        self.page_url.clone().ok_or_else(|| AppError::NotionService {
            code: NotionErrorCode::ObjectNotFound,
            message: "page not found".to_string(),
            status: 404,
        })
    }
}

/// Generator that returns `blueprint(prompt)` and counts its calls.
#[derive(Default)]
pub struct FakeGenerator {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BlueprintGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<Blueprint, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::GenerationFailed("model unavailable".to_string()));
        }
        Ok(blueprint(prompt))
    }
}
