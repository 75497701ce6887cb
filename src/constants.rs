// src/constants.rs
//! Policy constants for the cache, the builder and the Notion transport.
//!
//! Tunables that operators are expected to change (similarity threshold,
//! memory tier size) live in `CacheSettings`; the values here are fixed
//! policy.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API
// ---------------------------------------------------------------------------

/// API version sent in the `Notion-Version` header.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Base URL of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Public site used when a page URL has to be reconstructed locally.
pub const NOTION_SITE_BASE_URL: &str = "https://www.notion.so";

/// Attempts per Notion write call (first try included).
pub const NOTION_RETRY_ATTEMPTS: u32 = 3;

/// First backoff delay between retries; doubles up to `NOTION_RETRY_MAX_DELAY`.
pub const NOTION_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);

pub const NOTION_RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Pause between two builds in a batch, to stay under Notion's rate limit.
///
/// Applied build-to-build only, never between the calls of a single build.
pub const INTER_BUILD_DELAY: Duration = Duration::from_secs(1);

/// Icon for callout blocks that don't name one.
pub const DEFAULT_CALLOUT_ICON: &str = "💡";

/// Icon on the placeholder row's instructional callout.
pub const PLACEHOLDER_ICON: &str = "💡";

/// Paragraph emitted when a linked database cannot be resolved in this build.
pub const DATABASE_LINK_FALLBACK_TEXT: &str = "[Database link]";

/// Query parameter that turns a page URL into a duplicate link.
pub const DUPLICATE_QUERY_PARAM: (&str, &str) = ("duplicate", "true");

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Estimated cost of one avoided generation call, in US dollars.
pub const GENERATION_COST_PER_CALL_USD: f64 = 0.002;

/// How many templates the analytics report lists as popular.
pub const POPULAR_TEMPLATE_LIMIT: usize = 5;
