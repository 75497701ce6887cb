//! Seeds the cache with every curated template prompt.

use super::{TemplateMetadata, TemplateRegistry};
use crate::cache::BlueprintCache;
use crate::model::Blueprint;
use crate::prompt::{normalize, PromptHash};
use crate::store::{ConflictPolicy, NewCacheEntry, StoreError};
use serde::Serialize;
use std::collections::BTreeSet;

/// Counts of one preload run. `total = inserted + skipped + errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    pub total: usize,
    pub inserted: usize,
    /// Prompts whose hash was already cached, including repeats across templates.
    pub skipped: usize,
    pub errors: usize,
}

enum Seeded {
    Inserted,
    AlreadyCached,
}

/// Stores each template's sample blueprint under every prompt it answers.
///
/// Existing entries are left alone, so running this twice is harmless.
/// Store failures are counted and logged; seeding carries on.
pub async fn preload_cache(cache: &BlueprintCache, registry: &TemplateRegistry) -> PreloadReport {
    let mut report = PreloadReport::default();

    for template in registry.all() {
        let template_keywords = template.keywords();
        let blueprint = template.sample_blueprint();

        for prompt in &template.prompts {
            report.total += 1;
            match seed(cache, template, prompt, &blueprint, &template_keywords).await {
                Ok(Seeded::Inserted) => report.inserted += 1,
                Ok(Seeded::AlreadyCached) => {
                    log::debug!("'{}' already cached, skipping", prompt);
                    report.skipped += 1;
                }
                Err(e) => {
                    log::warn!("Failed to seed '{}' ({}): {}", prompt, template.id, e);
                    report.errors += 1;
                }
            }
        }
    }

    log::info!(
        "Preload complete: {} inserted, {} skipped, {} errors of {} prompts",
        report.inserted,
        report.skipped,
        report.errors,
        report.total
    );
    report
}

async fn seed(
    cache: &BlueprintCache,
    template: &TemplateMetadata,
    prompt: &str,
    blueprint: &Blueprint,
    template_keywords: &BTreeSet<String>,
) -> Result<Seeded, StoreError> {
    let normalized = normalize(prompt);
    let hash = PromptHash::of_normalized(&normalized);
    if cache.store().find_by_hash(&hash).await?.is_some() {
        return Ok(Seeded::AlreadyCached);
    }

    let mut keywords = cache.keywords(prompt);
    keywords.extend(template_keywords.iter().cloned());

    let entry = NewCacheEntry {
        prompt_hash: hash,
        prompt_original: prompt.to_string(),
        prompt_normalized: normalized,
        keywords,
        blueprint: blueprint.clone(),
        category: template.category.to_lowercase(),
        created_by: None,
        successful_builds: 1,
    };
    cache.insert(entry, ConflictPolicy::IgnoreDuplicate).await?;
    Ok(Seeded::Inserted)
}
