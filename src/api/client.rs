// src/api/client.rs
//! HTTP client for the Notion API.
//!
//! Handles authentication, error-body parsing and retry of transient
//! failures. Request bodies come from [`super::payload`].

use super::payload::{self, BlockPayload};
use super::WorkspaceTarget;
use crate::constants::{
    NOTION_API_BASE_URL, NOTION_API_VERSION, NOTION_RETRY_ATTEMPTS, NOTION_RETRY_INITIAL_DELAY,
    NOTION_RETRY_MAX_DELAY,
};
use crate::error::AppError;
use crate::error_recovery::retry_with_backoff;
use crate::model::PropertySpec;
use crate::types::{ApiKey, DatabaseId, PageId};
use indexmap::IndexMap;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

/// The fields of a created or retrieved object this crate reads back.
#[derive(Debug, Deserialize)]
struct ObjectRef {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Same as [`NotionHttpClient::new`] against another API root.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// POSTs `body` to `endpoint`, retrying transient failures.
    async fn post(&self, endpoint: &str, body: &Value) -> Result<ObjectRef, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        let url = url.as_str();
        retry_with_backoff(
            || async move {
                let response = self.client.post(url).json(body).send().await?;
                read_object(response).await
            },
            NOTION_RETRY_ATTEMPTS,
            NOTION_RETRY_INITIAL_DELAY,
            NOTION_RETRY_MAX_DELAY,
        )
        .await
    }

    async fn get(&self, endpoint: &str) -> Result<ObjectRef, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        let url = url.as_str();
        retry_with_backoff(
            || async move {
                let response = self.client.get(url).send().await?;
                read_object(response).await
            },
            NOTION_RETRY_ATTEMPTS,
            NOTION_RETRY_INITIAL_DELAY,
            NOTION_RETRY_MAX_DELAY,
        )
        .await
    }
}

/// Turns a response into the created object's reference or a typed error.
async fn read_object(response: reqwest::Response) -> Result<ObjectRef, AppError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(AppError::from_notion_response(status.as_u16(), &text));
    }
    serde_json::from_str(&text).map_err(|e| {
        AppError::MalformedResponse(format!("Unexpected Notion response ({}): {}", e, text))
    })
}

#[async_trait::async_trait]
impl WorkspaceTarget for NotionHttpClient {
    async fn create_page(
        &self,
        parent: &PageId,
        title: &str,
        icon: Option<&str>,
        blocks: &[BlockPayload],
    ) -> Result<PageId, AppError> {
        let body = payload::page_body(parent, title, icon, blocks);
        let created = self.post("pages", &body).await?;
        log::info!("Created page '{}' ({})", title, created.id);
        Ok(PageId::parse(&created.id)?)
    }

    async fn create_database(
        &self,
        parent: &PageId,
        title: &str,
        description: Option<&str>,
        properties: &IndexMap<String, PropertySpec>,
    ) -> Result<DatabaseId, AppError> {
        let body = payload::database_body(parent, title, description, properties);
        let created = self.post("databases", &body).await?;
        log::info!("Created database '{}' ({})", title, created.id);
        Ok(DatabaseId::parse(&created.id)?)
    }

    async fn create_row(
        &self,
        database: &DatabaseId,
        title_property: &str,
        title: &str,
        blocks: &[BlockPayload],
    ) -> Result<PageId, AppError> {
        let body = payload::row_body(database, title_property, title, blocks);
        let created = self.post("pages", &body).await?;
        log::debug!("Created row '{}' in {}", title, database);
        Ok(PageId::parse(&created.id)?)
    }

    async fn retrieve_page_url(&self, page: &PageId) -> Result<String, AppError> {
        let endpoint = format!("pages/{}", page.to_dashed());
        self.get(&endpoint).await?.url.ok_or_else(|| {
            AppError::MalformedResponse(format!("Page {} has no url field", page))
        })
    }
}
