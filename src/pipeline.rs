// src/pipeline.rs
//! Prompt-to-workspace orchestration: resolve a prompt to a blueprint
//! through the cache (generating on a miss), then build it.

use crate::builder::{BuildResult, WorkspaceBuilder};
use crate::cache::{BlueprintCache, CacheSource, CacheTier};
use crate::error::AppError;
use crate::generator::BlueprintGenerator;
use crate::model::Blueprint;
use crate::types::{CacheId, PageId, ValidationError};
use serde::Serialize;
use std::sync::Arc;

/// A blueprint ready to build, with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBlueprint {
    pub blueprint: Blueprint,
    /// Absent when a generated blueprint could not be cached.
    pub cache_id: Option<CacheId>,
    pub source: CacheSource,
    pub similarity: Option<f64>,
    pub tier: Option<CacheTier>,
}

impl ResolvedBlueprint {
    pub fn is_cached(&self) -> bool {
        self.source == CacheSource::Cache
    }
}

pub struct BlueprintService {
    cache: Arc<BlueprintCache>,
    generator: Arc<dyn BlueprintGenerator>,
    builder: Option<WorkspaceBuilder>,
}

impl BlueprintService {
    pub fn new(cache: Arc<BlueprintCache>, generator: Arc<dyn BlueprintGenerator>) -> Self {
        Self {
            cache,
            generator,
            builder: None,
        }
    }

    /// Enables [`BlueprintService::build`].
    pub fn with_builder(mut self, builder: WorkspaceBuilder) -> Self {
        self.builder = Some(builder);
        self
    }

    pub fn cache(&self) -> &BlueprintCache {
        &self.cache
    }

    /// Cache first; on a miss, generates and caches the result.
    ///
    /// Caching is best effort: a generated blueprint is returned even when
    /// it could not be stored.
    pub async fn resolve(
        &self,
        prompt: &str,
        user_id: Option<&str>,
    ) -> Result<ResolvedBlueprint, AppError> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyField("prompt").into());
        }

        let lookup = self.cache.find_cached_blueprint(prompt).await;
        if let (true, Some(blueprint)) = (lookup.found, lookup.blueprint) {
            return Ok(ResolvedBlueprint {
                blueprint,
                cache_id: lookup.cache_id,
                source: CacheSource::Cache,
                similarity: lookup.similarity,
                tier: lookup.tier,
            });
        }

        log::info!("Cache miss, generating a new blueprint");
        let blueprint = self.generator.generate(prompt).await?;
        let cache_id = self
            .cache
            .cache_blueprint(prompt, &blueprint, user_id)
            .await;

        Ok(ResolvedBlueprint {
            blueprint,
            cache_id,
            source: CacheSource::Generated,
            similarity: None,
            tier: None,
        })
    }

    /// Builds a resolved blueprint under `parent` and records the outcome
    /// against its cache entry.
    ///
    /// A build that created the root page counts as successful even when
    /// later objects were skipped.
    pub async fn build(
        &self,
        resolved: &ResolvedBlueprint,
        parent: &PageId,
    ) -> Result<BuildResult, AppError> {
        let builder = self.builder.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration("no Notion workspace configured for builds".to_string())
        })?;

        let result = builder
            .build_and_publish(&resolved.blueprint, parent)
            .await
            .map(|(_, result)| result);

        if let Some(cache_id) = &resolved.cache_id {
            self.cache.update_cache_stats(cache_id, result.is_ok());
        }
        result
    }
}
