// tests/cache_tiers.rs
//! Tier ordering, thresholds and outage handling of the blueprint cache.

mod common;

use common::{blueprint, CountingStore};
use notion_blueprint::{
    similarity, BlueprintCache, BlueprintStore, CacheLookup, CacheSettings, CacheSource,
    CacheTier, JsonFileStore, PropertyKind, PropertySpec,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn cache_over(store: &Arc<CountingStore>, settings: CacheSettings) -> BlueprintCache {
    BlueprintCache::new(store.clone(), settings)
}

#[tokio::test]
async fn memory_tier_answers_without_touching_the_store() {
    let store = Arc::new(CountingStore::new());
    let cache = cache_over(&store, CacheSettings::default());
    let id = cache
        .cache_blueprint("habit tracker", &blueprint("Habits"), None)
        .await
        .unwrap();

    let first = cache.find_cached_blueprint("habit tracker").await;
    assert_eq!(first.tier, Some(CacheTier::Exact));

    let calls_before = store.calls();
    let second = cache.find_cached_blueprint("Habit Tracker!!").await;
    assert_eq!(second.tier, Some(CacheTier::Memory));
    assert_eq!(second.cache_id, Some(id));
    assert_eq!(second.similarity, Some(1.0));
    assert_eq!(store.calls(), calls_before);
}

#[tokio::test]
async fn disabled_memory_tier_falls_through_to_exact() {
    let store = Arc::new(CountingStore::new());
    let settings = CacheSettings {
        memory_capacity: 0,
        ..CacheSettings::default()
    };
    let cache = cache_over(&store, settings);
    cache
        .cache_blueprint("budget tracker", &blueprint("Budget"), None)
        .await
        .unwrap();

    for _ in 0..2 {
        let lookup = cache.find_cached_blueprint("budget tracker").await;
        assert_eq!(lookup.tier, Some(CacheTier::Exact));
    }
}

#[tokio::test]
async fn synonym_prompt_is_served_from_keyword_tier() {
    let store = Arc::new(CountingStore::new());
    let cache = cache_over(&store, CacheSettings::default());
    let id = cache
        .cache_blueprint("habit tracker", &blueprint("Habits"), None)
        .await
        .unwrap();

    let lookup = cache.find_cached_blueprint("track my daily habits").await;
    assert!(lookup.found);
    assert_eq!(lookup.tier, Some(CacheTier::Keyword));
    assert_eq!(lookup.cache_id, Some(id.clone()));
    let score = lookup.similarity.unwrap();
    assert!(score >= 0.65, "score {score} below threshold");
    assert!(score < 1.0);

    // the keyword hit is remembered under the new prompt
    let again = cache.find_cached_blueprint("track my daily habits").await;
    assert_eq!(again.tier, Some(CacheTier::Memory));
    assert_eq!(again.similarity, Some(1.0));

    cache.flush().await;
    assert_eq!(store.inner.get(&id).unwrap().times_used, 2);
}

#[tokio::test]
async fn threshold_is_inclusive() {
    let store = Arc::new(CountingStore::new());
    let cache = cache_over(&store, CacheSettings::default());
    cache
        .cache_blueprint("habit tracker", &blueprint("Habits"), None)
        .await
        .unwrap();

    let query = "track my daily habits";
    let score = similarity(query, "habit tracker");

    let above = cache.find_with_threshold(query, score + 0.01).await;
    assert_eq!(above, CacheLookup::miss());

    let at = cache.find_with_threshold(query, score).await;
    assert_eq!(at.tier, Some(CacheTier::Keyword));
    assert_eq!(at.similarity, Some(score));
}

#[tokio::test]
async fn best_scoring_candidate_wins() {
    let store = Arc::new(CountingStore::new());
    let cache = cache_over(&store, CacheSettings::default());
    cache
        .cache_blueprint("project tracker", &blueprint("Tracker"), None)
        .await
        .unwrap();
    let system = cache
        .cache_blueprint("project management system", &blueprint("System"), None)
        .await
        .unwrap();

    let lookup = cache.find_cached_blueprint("project management").await;
    assert_eq!(lookup.cache_id, Some(system));
    assert_eq!(lookup.blueprint.unwrap().title, "System");
}

#[tokio::test]
async fn store_outage_degrades_to_miss() {
    let store = Arc::new(CountingStore::new());
    let cache = cache_over(&store, CacheSettings::default());
    store.set_failing(true);

    let lookup = cache.find_cached_blueprint("habit tracker").await;
    assert!(!lookup.found);
    assert_eq!(lookup.source, CacheSource::Generated);
    assert!(cache
        .cache_blueprint("habit tracker", &blueprint("Habits"), None)
        .await
        .is_none());
    assert!(cache.get_cache_analytics().await.is_none());

    store.set_failing(false);
    assert!(cache
        .cache_blueprint("habit tracker", &blueprint("Habits"), None)
        .await
        .is_some());
    assert!(cache.find_cached_blueprint("habit tracker").await.found);
}

#[tokio::test]
async fn exact_tier_error_skips_keyword_tier() {
    let store = Arc::new(CountingStore::new());
    let cache = cache_over(&store, CacheSettings::default());
    cache
        .cache_blueprint("habit tracker", &blueprint("Habits"), None)
        .await
        .unwrap();
    store.set_failing(true);
    let hash_lookups = store.hash_lookups.load(Ordering::SeqCst);
    let keyword_queries = store.keyword_queries.load(Ordering::SeqCst);

    let lookup = cache.find_cached_blueprint("track my daily habits").await;
    assert_eq!(lookup, CacheLookup::miss());
    assert_eq!(store.hash_lookups.load(Ordering::SeqCst), hash_lookups + 1);
    assert_eq!(store.keyword_queries.load(Ordering::SeqCst), keyword_queries);
}

#[tokio::test]
async fn unrelated_prompt_misses() {
    let store = Arc::new(CountingStore::new());
    let cache = cache_over(&store, CacheSettings::default());
    cache
        .cache_blueprint("meal planner", &blueprint("Meals"), None)
        .await
        .unwrap();

    let lookup = cache.find_cached_blueprint("travel itinerary").await;
    assert_eq!(lookup, CacheLookup::miss());
}

#[tokio::test]
async fn failed_insert_is_not_served_later() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blueprint_cache.json");
    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let cache = BlueprintCache::new(store.clone(), CacheSettings::default());

    let blocker = path.with_extension("json.tmp");
    std::fs::create_dir(&blocker).unwrap();
    assert!(cache
        .cache_blueprint("habit tracker", &blueprint("Habits"), None)
        .await
        .is_none());
    assert_eq!(cache.find_cached_blueprint("habit tracker").await, CacheLookup::miss());
    assert!(store.list_entries().await.unwrap().is_empty());

    std::fs::remove_dir(&blocker).unwrap();
    let id = cache
        .cache_blueprint("habit tracker", &blueprint("Habits"), None)
        .await
        .unwrap();
    let lookup = cache.find_cached_blueprint("habit tracker").await;
    assert_eq!(lookup.cache_id, Some(id));
}

#[tokio::test]
async fn file_backed_entries_keep_property_order_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blueprint_cache.json");
    let mut habits = blueprint("Habits");
    habits.databases[0]
        .properties
        .insert("Due".to_string(), PropertySpec::new(PropertyKind::Date));

    {
        let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
        let cache = BlueprintCache::new(store, CacheSettings::default());
        cache
            .cache_blueprint("habit tracker", &habits, None)
            .await
            .unwrap();
        cache.flush().await;
    }

    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let cache = BlueprintCache::new(store, CacheSettings::default());
    let lookup = cache.find_cached_blueprint("habit tracker").await;
    assert_eq!(lookup.tier, Some(CacheTier::Exact));
    let restored = lookup.blueprint.unwrap();
    let names: Vec<&str> = restored.databases[0]
        .properties
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["Name", "Status", "Due"]);
}
