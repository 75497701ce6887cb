// src/api/mod.rs
//! Notion API interaction: the ability to create content in a workspace.
//!
//! The builder depends on [`WorkspaceTarget`], never on HTTP details.

pub mod client;
pub mod payload;

pub use client::NotionHttpClient;
pub use payload::BlockPayload;

use crate::error::AppError;
use crate::model::PropertySpec;
use crate::types::{DatabaseId, PageId};
use indexmap::IndexMap;

/// The object-creation primitives a workspace build needs.
#[async_trait::async_trait]
pub trait WorkspaceTarget: Send + Sync {
    /// Creates a page under `parent` with `blocks` as its initial content.
    async fn create_page(
        &self,
        parent: &PageId,
        title: &str,
        icon: Option<&str>,
        blocks: &[BlockPayload],
    ) -> Result<PageId, AppError>;

    async fn create_database(
        &self,
        parent: &PageId,
        title: &str,
        description: Option<&str>,
        properties: &IndexMap<String, PropertySpec>,
    ) -> Result<DatabaseId, AppError>;

    /// Adds a row whose `title_property` column holds `title`.
    async fn create_row(
        &self,
        database: &DatabaseId,
        title_property: &str,
        title: &str,
        blocks: &[BlockPayload],
    ) -> Result<PageId, AppError>;

    /// The canonical URL of a page.
    async fn retrieve_page_url(&self, page: &PageId) -> Result<String, AppError>;
}
