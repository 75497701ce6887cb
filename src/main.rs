// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_blueprint::config::Command;
use notion_blueprint::generator::MissingGenerator;
use notion_blueprint::{
    preload_cache, AppConfig, AppError, BlueprintCache, BlueprintGenerator, BlueprintService,
    BlueprintStore, Blueprint, CommandLineInput, HttpBlueprintGenerator, InMemoryStore,
    JsonFileStore, NotionHttpClient, StoreLocation, TemplateRegistry, WorkspaceBuilder,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_blueprint.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

async fn open_store(location: &StoreLocation) -> Result<Arc<dyn BlueprintStore>, AppError> {
    Ok(match location {
        StoreLocation::Memory => {
            log::info!("Cache persistence disabled, using an in-memory store");
            Arc::new(InMemoryStore::new())
        }
        StoreLocation::File(path) => {
            log::info!("Cache store: {}", path.display());
            Arc::new(JsonFileStore::open(path.clone()).await?)
        }
    })
}

fn workspace_builder(config: &AppConfig) -> Result<WorkspaceBuilder, AppError> {
    let client = NotionHttpClient::new(config.require_notion_token()?)?;
    Ok(WorkspaceBuilder::new(Arc::new(client)))
}

fn generator(config: &AppConfig) -> Result<Arc<dyn BlueprintGenerator>, AppError> {
    Ok(match &config.generator_url {
        Some(url) => Arc::new(HttpBlueprintGenerator::new(url.clone())?),
        None => Arc::new(MissingGenerator),
    })
}

fn read_blueprint(path: &Path) -> Result<Blueprint, AppError> {
    let text = fs::read_to_string(path)?;
    let blueprint: Blueprint =
        serde_json::from_str(&text).map_err(|source| AppError::JsonParseError {
            path: path.to_path_buf(),
            source,
        })?;
    blueprint.validate()?;
    Ok(blueprint)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(
    command: Command,
    config: &AppConfig,
    cache: Arc<BlueprintCache>,
) -> anyhow::Result<()> {
    match command {
        Command::Blueprint {
            prompt,
            build,
            parent,
            user,
        } => {
            let mut service = BlueprintService::new(cache, generator(config)?);
            let parent = if build {
                service = service.with_builder(workspace_builder(config)?);
                Some(config.parent_page(parent.as_deref())?)
            } else {
                None
            };

            let resolved = service.resolve(&prompt, user.as_deref()).await?;
            match resolved.similarity {
                Some(similarity) if resolved.is_cached() => {
                    eprintln!("✓ Cached blueprint ({:.1}% match)", similarity * 100.0)
                }
                _ => eprintln!("✓ Generated a new blueprint"),
            }
            print_json(&resolved)?;

            if let Some(parent) = parent {
                let result = service.build(&resolved, &parent).await?;
                eprintln!("✓ Built at {}", result.notion_url);
                print_json(&result)?;
            }
        }

        Command::Build { file, parent } => {
            let blueprint = read_blueprint(&file)
                .with_context(|| format!("could not load blueprint from {}", file.display()))?;
            let parent = config.parent_page(parent.as_deref())?;
            let builder = workspace_builder(config)?;

            let (outcome, result) = builder.build_and_publish(&blueprint, &parent).await?;
            for failure in &outcome.failures {
                eprintln!(
                    "⚠️  Skipped {} '{}': {}",
                    failure.object, failure.name, failure.reason
                );
            }
            eprintln!(
                "✓ Built '{}': {} databases, {} pages",
                blueprint.title,
                outcome.databases.len(),
                outcome.pages.len()
            );
            print_json(&result)?;
        }

        Command::BuildTemplates { ids, parent } => {
            let templates = TemplateRegistry::curated().select(&ids)?;
            let parent = config.parent_page(parent.as_deref())?;
            let builder = workspace_builder(config)?;

            let blueprints: Vec<Blueprint> =
                templates.iter().map(|t| t.sample_blueprint()).collect();
            let results = builder.build_batch(&blueprints, &parent).await;

            let mut built = 0;
            for (template, result) in templates.iter().zip(results) {
                match result {
                    Ok(result) => {
                        built += 1;
                        println!("{}\t{}", template.id, result.duplicate_link);
                    }
                    Err(e) => eprintln!("❌ {}: {}", template.id, e),
                }
            }
            eprintln!("✓ Built {}/{} templates", built, templates.len());
        }

        Command::Search {
            query,
            category,
            min_score,
        } => {
            let results =
                TemplateRegistry::curated().search(&query, category.as_deref(), min_score);
            if results.has_exact_matches() {
                eprintln!("✓ {} matching templates", results.exact_matches.len());
            } else {
                eprintln!("No exact matches, showing similar templates");
            }
            print_json(&results)?;
        }

        Command::Preload => {
            let report = preload_cache(&cache, TemplateRegistry::curated()).await;
            eprintln!(
                "✓ Preloaded {} prompts ({} already cached, {} errors)",
                report.inserted, report.skipped, report.errors
            );
            print_json(&report)?;
        }

        Command::Analytics => {
            let analytics = cache
                .get_cache_analytics()
                .await
                .context("cache analytics are unavailable")?;
            print_json(&serde_json::json!({
                "analytics": analytics,
                "savings": analytics.savings_estimate(),
            }))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("could not set up logging: {}", e))?;

    let config = AppConfig::resolve(&cli)?;
    let store = open_store(&config.store).await?;
    let cache = Arc::new(BlueprintCache::new(store, config.cache.clone()));

    let outcome = run(cli.command, &config, cache.clone()).await;
    cache.flush().await;
    outcome
}
