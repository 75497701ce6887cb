//! Curated gallery templates, their sample blueprints and cache seeding.

mod catalog;
mod preload;
mod search;

pub use preload::{preload_cache, PreloadReport};
pub use search::{MatchType, SearchHit, SearchResults, DEFAULT_MIN_SEARCH_SIMILARITY};

use crate::error::AppError;
use crate::model::{Blueprint, BlockKind, BlockSpec, DatabaseSpec, PageSpec};
use crate::model::{PropertyKind, PropertySpec};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\s]")
        .expect("Invalid non-word regex - this is a bug in the code");
}

static CURATED_REGISTRY: Lazy<TemplateRegistry> = Lazy::new(|| {
    TemplateRegistry::new(catalog::CURATED.iter().map(TemplateMetadata::from).collect())
});

/// A gallery template and the prompts it answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub icon: String,
    pub tags: Vec<String>,
    pub is_pro: bool,
    pub price: f64,
    /// Filled in once the template has been built in the gallery workspace.
    pub duplicate_link: Option<String>,
    pub prompts: Vec<String>,
}

impl From<&catalog::CuratedTemplate> for TemplateMetadata {
    fn from(template: &catalog::CuratedTemplate) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.to_string(),
            description: template.description.to_string(),
            category: template.category.to_string(),
            icon: template.icon.to_string(),
            tags: template.tags.iter().map(|t| t.to_string()).collect(),
            is_pro: template.is_pro,
            price: template.price,
            duplicate_link: None,
            prompts: template.prompts.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl TemplateMetadata {
    /// Name without emoji or punctuation.
    pub fn plain_name(&self) -> String {
        NON_WORD.replace_all(&self.name, "").trim().to_string()
    }

    /// Keywords the template contributes to every seeded entry: lowercased
    /// tags, name words longer than two characters and the category.
    pub fn keywords(&self) -> BTreeSet<String> {
        let mut keywords: BTreeSet<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();
        let name = NON_WORD.replace_all(&self.name, "").to_lowercase();
        keywords.extend(
            name.split_whitespace()
                .filter(|word| word.chars().count() > 2)
                .map(str::to_string),
        );
        keywords.insert(self.category.to_lowercase());
        keywords
    }

    /// Starter blueprint: one `<id>_main` database and a dashboard linking it.
    pub fn sample_blueprint(&self) -> Blueprint {
        let key = format!("{}_main", self.id);

        let mut properties = IndexMap::new();
        properties.insert("Name".to_string(), PropertySpec::new(PropertyKind::Title));
        properties.insert(
            "Status".to_string(),
            PropertySpec::with_options(
                PropertyKind::Select,
                ["Not Started", "In Progress", "Done"],
            ),
        );
        properties.insert("Date".to_string(), PropertySpec::new(PropertyKind::Date));
        properties.insert("Notes".to_string(), PropertySpec::new(PropertyKind::Text));

        let mut dashboard_link = BlockSpec::linked_database(&key);
        dashboard_link.linked_database_view = Some(serde_json::json!({ "layout": "table" }));

        Blueprint {
            title: self.name.clone(),
            description: self.description.clone(),
            icon: Some(self.icon.clone()),
            databases: vec![DatabaseSpec {
                key,
                title: self.plain_name(),
                description: None,
                properties,
            }],
            pages: vec![PageSpec {
                title: format!("📊 {} Dashboard", self.name),
                icon: Some(self.icon.clone()),
                blocks: vec![
                    BlockSpec::text(BlockKind::Heading1, &format!("Welcome to {}", self.name)),
                    BlockSpec::callout(&self.description, Some("💡")),
                    dashboard_link,
                ],
            }],
        }
    }
}

/// Lookup over a fixed set of templates.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<TemplateMetadata>,
}

impl TemplateRegistry {
    pub fn new(templates: Vec<TemplateMetadata>) -> Self {
        Self { templates }
    }

    /// The built-in gallery.
    pub fn curated() -> &'static TemplateRegistry {
        &CURATED_REGISTRY
    }

    pub fn all(&self) -> &[TemplateMetadata] {
        &self.templates
    }

    pub fn find_by_id(&self, id: &str) -> Option<&TemplateMetadata> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates named by `ids` in the given order, or all when `ids` is empty.
    pub fn select(&self, ids: &[String]) -> Result<Vec<&TemplateMetadata>, AppError> {
        if ids.is_empty() {
            return Ok(self.templates.iter().collect());
        }
        ids.iter()
            .map(|id| {
                self.find_by_id(id)
                    .ok_or_else(|| AppError::UnknownTemplate(id.clone()))
            })
            .collect()
    }

    /// Number of prompts across all templates, duplicates included.
    pub fn prompt_count(&self) -> usize {
        self.templates.iter().map(|t| t.prompts.len()).sum()
    }
}
