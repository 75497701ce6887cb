//! Materializes a blueprint as Notion objects.
//!
//! A build runs in three strictly ordered phases:
//!
//! 1. the root page under the parent, with the description as its first
//!    paragraph;
//! 2. each database in listed order, followed by its placeholder row;
//! 3. each content page in listed order, with `linked_database` blocks
//!    resolved against the ids created in phase 2.
//!
//! Only a root page failure aborts the build. Any later object that fails
//! is logged, recorded in [`BuildOutcome::failures`] and skipped. Builds are
//! not idempotent: building the same blueprint twice yields two workspaces.

mod publish;
mod translate;

pub use publish::{duplicate_link, fallback_page_url, publish, slugify, BuildResult};
pub use translate::{placeholder_blocks, placeholder_title, translate_block, translate_blocks};

use crate::api::{BlockPayload, WorkspaceTarget};
use crate::constants::INTER_BUILD_DELAY;
use crate::error::AppError;
use crate::model::{Blueprint, DatabaseSpec, PageSpec};
use crate::types::{DatabaseId, PageId, ValidationError};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Kind of object that failed during phases 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildObject {
    Database,
    PlaceholderRow,
    Page,
}

impl fmt::Display for BuildObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildObject::Database => write!(f, "database"),
            BuildObject::PlaceholderRow => write!(f, "placeholder row"),
            BuildObject::Page => write!(f, "page"),
        }
    }
}

/// One object a build had to skip.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildFailure {
    pub object: BuildObject,
    pub name: String,
    pub reason: String,
}

/// What a build created.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    pub root_page_id: PageId,
    /// Created databases by blueprint key, in creation order.
    pub databases: IndexMap<String, DatabaseId>,
    pub pages: Vec<PageId>,
    pub placeholder_rows: usize,
    pub failures: Vec<BuildFailure>,
}

impl BuildOutcome {
    /// True when every object of the blueprint was created.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct WorkspaceBuilder {
    target: Arc<dyn WorkspaceTarget>,
    inter_build_delay: Duration,
}

impl WorkspaceBuilder {
    pub fn new(target: Arc<dyn WorkspaceTarget>) -> Self {
        Self {
            target,
            inter_build_delay: INTER_BUILD_DELAY,
        }
    }

    /// Overrides the pause between builds of a batch.
    pub fn with_inter_build_delay(mut self, delay: Duration) -> Self {
        self.inter_build_delay = delay;
        self
    }

    pub fn target(&self) -> &dyn WorkspaceTarget {
        self.target.as_ref()
    }

    /// Builds `blueprint` under `parent` and returns what was created.
    ///
    /// A structurally invalid blueprint is rejected before any call. A link
    /// to an unknown database key is only logged; the page gets the
    /// fallback paragraph.
    pub async fn build(
        &self,
        blueprint: &Blueprint,
        parent: &PageId,
    ) -> Result<BuildOutcome, AppError> {
        match blueprint.validate() {
            Ok(()) => {}
            Err(e @ ValidationError::UnresolvedDatabaseLink { .. }) => {
                log::warn!("Building '{}' anyway: {}", blueprint.title, e);
            }
            Err(e) => return Err(e.into()),
        }
        log::info!("Building '{}' under {}", blueprint.title, parent);

        let root_page_id = self.create_root(blueprint, parent).await?;
        let mut outcome = BuildOutcome {
            root_page_id,
            databases: IndexMap::new(),
            pages: Vec::new(),
            placeholder_rows: 0,
            failures: Vec::new(),
        };

        for database in &blueprint.databases {
            self.create_database(database, &mut outcome).await;
        }

        for page in &blueprint.pages {
            self.create_page(page, &mut outcome).await;
        }

        if outcome.is_complete() {
            log::info!(
                "Built '{}': {} databases, {} pages",
                blueprint.title,
                outcome.databases.len(),
                outcome.pages.len()
            );
        } else {
            log::warn!(
                "Built '{}' with {} skipped objects",
                blueprint.title,
                outcome.failures.len()
            );
        }
        Ok(outcome)
    }

    /// Builds and then resolves the root page URL and duplicate link.
    pub async fn build_and_publish(
        &self,
        blueprint: &Blueprint,
        parent: &PageId,
    ) -> Result<(BuildOutcome, BuildResult), AppError> {
        let outcome = self.build(blueprint, parent).await?;
        let result = publish(self.target(), &outcome.root_page_id, &blueprint.title).await;
        Ok((outcome, result))
    }

    /// Builds each blueprint in turn, pausing between builds.
    ///
    /// Every build stands alone: one failing does not stop the rest.
    pub async fn build_batch(
        &self,
        blueprints: &[Blueprint],
        parent: &PageId,
    ) -> Vec<Result<BuildResult, AppError>> {
        let mut results = Vec::with_capacity(blueprints.len());
        for (index, blueprint) in blueprints.iter().enumerate() {
            if index > 0 && !self.inter_build_delay.is_zero() {
                tokio::time::sleep(self.inter_build_delay).await;
            }
            log::info!("[{}/{}] {}", index + 1, blueprints.len(), blueprint.title);
            let result = self
                .build_and_publish(blueprint, parent)
                .await
                .map(|(_, result)| result);
            if let Err(e) = &result {
                log::warn!("Build of '{}' failed: {}", blueprint.title, e);
            }
            results.push(result);
        }
        results
    }

    async fn create_root(
        &self,
        blueprint: &Blueprint,
        parent: &PageId,
    ) -> Result<PageId, AppError> {
        let mut blocks = Vec::new();
        if !blueprint.description.trim().is_empty() {
            blocks.push(BlockPayload::paragraph(&blueprint.description));
        }

        self.target
            .create_page(parent, &blueprint.title, blueprint.icon.as_deref(), &blocks)
            .await
            .map_err(|e| {
                AppError::BuildFailed(format!(
                    "could not create root page '{}': {}",
                    blueprint.title, e
                ))
            })
    }

    async fn create_database(&self, database: &DatabaseSpec, outcome: &mut BuildOutcome) {
        let created = self
            .target
            .create_database(
                &outcome.root_page_id,
                &database.title,
                database.description.as_deref(),
                &database.properties,
            )
            .await;

        let database_id = match created {
            Ok(id) => id,
            Err(e) => {
                record_failure(outcome, BuildObject::Database, &database.title, &e);
                return;
            }
        };
        outcome
            .databases
            .insert(database.key.clone(), database_id.clone());

        let Some(title_property) = database.title_property() else {
            log::warn!(
                "Database '{}' has no title property, skipping placeholder row",
                database.title
            );
            return;
        };

        let row = self
            .target
            .create_row(
                &database_id,
                title_property,
                &placeholder_title(&database.title),
                &placeholder_blocks(&database.title),
            )
            .await;
        match row {
            Ok(_) => outcome.placeholder_rows += 1,
            Err(e) => record_failure(outcome, BuildObject::PlaceholderRow, &database.title, &e),
        }
    }

    async fn create_page(&self, page: &PageSpec, outcome: &mut BuildOutcome) {
        let blocks = translate_blocks(&page.blocks, &outcome.databases);
        let created = self
            .target
            .create_page(
                &outcome.root_page_id,
                &page.title,
                page.icon.as_deref(),
                &blocks,
            )
            .await;
        match created {
            Ok(id) => outcome.pages.push(id),
            Err(e) => record_failure(outcome, BuildObject::Page, &page.title, &e),
        }
    }
}

fn record_failure(outcome: &mut BuildOutcome, object: BuildObject, name: &str, error: &AppError) {
    log::warn!("Failed to create {} '{}': {}", object, name, error);
    outcome.failures.push(BuildFailure {
        object,
        name: name.to_string(),
        reason: error.to_string(),
    });
}
