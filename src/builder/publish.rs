//! Page URL and duplicate link for a finished build.

use crate::api::WorkspaceTarget;
use crate::constants::{DUPLICATE_QUERY_PARAM, NOTION_SITE_BASE_URL};
use crate::types::{PageId, ValidatedUrl};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex =
        Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex - this is a bug in the code");
}

/// Where a built workspace lives and how others copy it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildResult {
    pub root_page_id: PageId,
    pub notion_url: String,
    pub duplicate_link: String,
}

/// Retrieves the root page's URL and derives the duplicate link from it.
///
/// If the URL cannot be retrieved, one is reconstructed from the page title
/// and id.
pub async fn publish(
    target: &dyn WorkspaceTarget,
    root_page_id: &PageId,
    title: &str,
) -> BuildResult {
    let notion_url = match target.retrieve_page_url(root_page_id).await {
        Ok(url) => url,
        Err(e) => {
            log::warn!(
                "Could not retrieve URL of page {}, deriving it locally: {}",
                root_page_id,
                e
            );
            fallback_page_url(title, root_page_id)
        }
    };

    BuildResult {
        root_page_id: root_page_id.clone(),
        duplicate_link: duplicate_link(&notion_url),
        notion_url,
    }
}

/// `url` with `duplicate=true` added to its query.
pub fn duplicate_link(url: &str) -> String {
    let (key, value) = DUPLICATE_QUERY_PARAM;
    match ValidatedUrl::parse(url) {
        Ok(parsed) => parsed.with_query_pair(key, value).to_string(),
        Err(_) => {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{}{}{}={}", url, separator, key, value)
        }
    }
}

/// `https://www.notion.so/<slug>-<id without dashes>`.
pub fn fallback_page_url(title: &str, page_id: &PageId) -> String {
    let id = page_id.as_str().replace('-', "");
    match slugify(title).as_str() {
        "" => format!("{}/{}", NOTION_SITE_BASE_URL, id),
        slug => format!("{}/{}-{}", NOTION_SITE_BASE_URL, slug, id),
    }
}

/// Lowercases and replaces every run of non-alphanumerics with one dash.
pub fn slugify(title: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}
