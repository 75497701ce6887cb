// src/lib.rs
//! notion-blueprint library: caches generated Notion workspace blueprints by
//! prompt similarity and builds them through the Notion API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Prompt analysis**: `normalize`, `PromptHash`, `KeywordTaxonomy`, `SimilarityScorer`
//! - **Cache**: `BlueprintCache`, `CacheLookup`, `BlueprintStore` and its implementations
//! - **Builder**: `WorkspaceBuilder`, `WorkspaceTarget`, `NotionHttpClient`
//! - **Templates**: `TemplateRegistry`, `preload_cache`
//! - **Orchestration**: `BlueprintService`, `BlueprintGenerator`

pub mod analytics;
pub mod api;
pub mod builder;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod generator;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod store;
pub mod templates;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::store::StoreError;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{AppConfig, CacheSettings, CommandLineInput, StoreLocation};

// --- Domain Model ---
pub use crate::model::{
    BlockKind, BlockSpec, Blueprint, DatabaseSpec, PageSpec, PropertyKind, PropertySpec,
};
pub use crate::types::{ApiKey, CacheId, DatabaseId, PageId, ValidatedUrl};

// --- Prompt Analysis ---
pub use crate::prompt::{
    categorize, extract_keywords, normalize, similarity, KeywordTaxonomy, PromptHash,
    SimilarityScorer, SimilarityWeights,
};

// --- Cache ---
pub use crate::analytics::{CacheAnalytics, PopularTemplate, SavingsEstimate};
pub use crate::cache::{BlueprintCache, CacheLookup, CacheSource, CacheTier};
pub use crate::store::{
    BlueprintStore, CacheEntry, ConflictPolicy, InMemoryStore, JsonFileStore, NewCacheEntry,
};

// --- Builder ---
pub use crate::api::{BlockPayload, NotionHttpClient, WorkspaceTarget};
pub use crate::builder::{BuildFailure, BuildObject, BuildOutcome, BuildResult, WorkspaceBuilder};

// --- Templates ---
pub use crate::templates::{
    preload_cache, MatchType, PreloadReport, SearchResults, TemplateMetadata, TemplateRegistry,
};

// --- Orchestration ---
pub use crate::generator::{BlueprintGenerator, HttpBlueprintGenerator};
pub use crate::pipeline::{BlueprintService, ResolvedBlueprint};
