// src/analytics/mod.rs
//! Usage statistics over the persistent blueprint cache.

use crate::constants::{GENERATION_COST_PER_CALL_USD, POPULAR_TEMPLATE_LIMIT};
use crate::store::CacheEntry;
use serde::Serialize;

/// Cache-wide usage report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheAnalytics {
    pub total_cached: usize,
    /// Sum of `times_used` over every entry.
    pub total_hits: u64,
    /// Reuse rate in percent, rounded.
    ///
    /// Hits beyond one per entry, relative to the number of successful
    /// builds. Zero when nothing has been built yet.
    pub hit_rate: i64,
    pub popular_templates: Vec<PopularTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularTemplate {
    pub title: String,
    pub uses: u64,
}

/// What reuse has saved compared to generating every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsEstimate {
    pub api_calls_saved: u64,
    pub cost_saved_usd: f64,
}

impl CacheAnalytics {
    pub fn from_entries(entries: &[CacheEntry]) -> Self {
        let total_cached = entries.len();
        let total_hits: u64 = entries.iter().map(|e| e.times_used).sum();
        let total_builds: u64 = entries.iter().map(|e| e.successful_builds).sum();

        let hit_rate = if total_builds > 0 {
            let reuse = total_hits as f64 - total_cached as f64;
            (reuse / total_builds as f64 * 100.0).round() as i64
        } else {
            0
        };

        let mut popular: Vec<&CacheEntry> = entries.iter().filter(|e| e.times_used > 1).collect();
        popular.sort_by(|a, b| b.times_used.cmp(&a.times_used));
        let popular_templates = popular
            .into_iter()
            .take(POPULAR_TEMPLATE_LIMIT)
            .map(|e| PopularTemplate {
                title: e.template_title.clone(),
                uses: e.times_used,
            })
            .collect();

        Self {
            total_cached,
            total_hits,
            hit_rate,
            popular_templates,
        }
    }

    /// Every hit beyond an entry's first use avoided one generation call.
    pub fn savings_estimate(&self) -> SavingsEstimate {
        let api_calls_saved = self.total_hits.saturating_sub(self.total_cached as u64);
        SavingsEstimate {
            api_calls_saved,
            cost_saved_usd: api_calls_saved as f64 * GENERATION_COST_PER_CALL_USD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Blueprint;
    use crate::prompt::PromptHash;
    use crate::store::NewCacheEntry;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn entry(title: &str, times_used: u64, successful_builds: u64) -> CacheEntry {
        let mut entry = NewCacheEntry {
            prompt_hash: PromptHash::of(title),
            prompt_original: title.to_string(),
            prompt_normalized: title.to_lowercase(),
            keywords: BTreeSet::new(),
            blueprint: Blueprint {
                title: title.to_string(),
                description: String::new(),
                icon: None,
                databases: vec![],
                pages: vec![],
            },
            category: "general".to_string(),
            created_by: None,
            successful_builds,
        }
        .into_entry();
        entry.times_used = times_used;
        entry
    }

    #[test]
    fn empty_cache_reports_zeroes() {
        let analytics = CacheAnalytics::from_entries(&[]);
        assert_eq!(analytics.total_cached, 0);
        assert_eq!(analytics.total_hits, 0);
        assert_eq!(analytics.hit_rate, 0);
        assert!(analytics.popular_templates.is_empty());
    }

    #[test]
    fn hit_rate_counts_reuse_per_successful_build() {
        let entries = vec![entry("Habits", 5, 2), entry("Budget", 1, 1), entry("CRM", 0, 1)];
        let analytics = CacheAnalytics::from_entries(&entries);
        assert_eq!(analytics.total_cached, 3);
        assert_eq!(analytics.total_hits, 6);
        // (6 - 3) / 4 builds
        assert_eq!(analytics.hit_rate, 75);
    }

    #[test]
    fn popular_templates_need_more_than_one_use_and_are_capped() {
        let entries: Vec<CacheEntry> = (0..8)
            .map(|i| entry(&format!("Template {i}"), i, 1))
            .collect();
        let analytics = CacheAnalytics::from_entries(&entries);

        let titles: Vec<&str> = analytics
            .popular_templates
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["Template 7", "Template 6", "Template 5", "Template 4", "Template 3"]
        );
        assert!(analytics.popular_templates.iter().all(|t| t.uses > 1));
    }

    #[test]
    fn savings_count_reuse_only() {
        let analytics = CacheAnalytics::from_entries(&[entry("Habits", 11, 1)]);
        let savings = analytics.savings_estimate();
        assert_eq!(savings.api_calls_saved, 10);
        assert!((savings.cost_saved_usd - 0.02).abs() < 1e-9);

        let unused = CacheAnalytics::from_entries(&[entry("Habits", 0, 0)]);
        assert_eq!(unused.savings_estimate().api_calls_saved, 0);
    }
}
