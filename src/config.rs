// src/config.rs
use crate::error::AppError;
use crate::prompt::SimilarityWeights;
use crate::types::{ApiKey, PageId, ValidatedUrl, ValidationError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_NOTION_TOKEN: &str = "NOTION_ADMIN_TOKEN";
pub const ENV_GALLERY_PAGE_ID: &str = "NOTION_GALLERY_PAGE_ID";
pub const ENV_GENERATOR_URL: &str = "BLUEPRINT_GENERATOR_URL";
pub const ENV_CACHE_PATH: &str = "BLUEPRINT_CACHE_PATH";

/// Tunables of the blueprint cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Lowest keyword-tier score accepted as a hit.
    pub min_similarity: f64,
    pub weights: SimilarityWeights,
    /// Entries held by the in-process tier.
    pub memory_capacity: usize,
    /// Idle time after which a memory tier entry is treated as absent.
    pub memory_ttl: Duration,
    /// Keyword candidates fetched from the store per lookup.
    pub candidate_limit: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            min_similarity: 0.65,
            weights: SimilarityWeights::default(),
            memory_capacity: 50,
            memory_ttl: Duration::from_secs(5 * 60),
            candidate_limit: 10,
        }
    }
}

impl CacheSettings {
    pub fn with_min_similarity(mut self, min_similarity: f64) -> Result<Self, ValidationError> {
        self.min_similarity = check_unit_interval("min_similarity", min_similarity)?;
        Ok(self)
    }

    fn from_options(options: &CacheOptions) -> Result<Self, ValidationError> {
        let settings = CacheSettings {
            weights: SimilarityWeights::new(options.keyword_weight, options.word_weight)?,
            memory_capacity: options.memory_capacity,
            memory_ttl: Duration::from_secs(options.memory_ttl),
            candidate_limit: options.candidate_limit,
            ..CacheSettings::default()
        };
        settings.with_min_similarity(options.min_similarity)
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<f64, ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            name,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Keep the cache in memory only (nothing is read from or written to disk)
    #[arg(long, global = true, default_value_t = false)]
    pub no_persist: bool,

    /// Path of the JSON cache file (defaults to the XDG cache directory)
    #[arg(long, global = true)]
    pub cache_path: Option<PathBuf>,

    #[command(flatten)]
    pub cache: CacheOptions,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a prompt to a blueprint (cache first, generator on miss) and print it
    Blueprint {
        /// Natural-language description of the workspace
        prompt: String,

        /// Also build the resolved blueprint in Notion
        #[arg(long, default_value_t = false)]
        build: bool,

        /// Parent page for the build (defaults to NOTION_GALLERY_PAGE_ID)
        #[arg(long)]
        parent: Option<String>,

        /// Record the entry as created by this user
        #[arg(long)]
        user: Option<String>,
    },

    /// Build a blueprint JSON file in Notion
    Build {
        /// Path to a blueprint JSON document
        file: PathBuf,

        /// Parent page for the build (defaults to NOTION_GALLERY_PAGE_ID)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Build the sample workspace of gallery templates
    BuildTemplates {
        /// Template ids to build (all templates when empty)
        ids: Vec<String>,

        /// Parent page for the builds (defaults to NOTION_GALLERY_PAGE_ID)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Search the template gallery
    Search {
        /// Words to look for in template names, descriptions and tags
        query: String,

        /// Only search this category (e.g. "Finance")
        #[arg(long)]
        category: Option<String>,

        /// Lowest score for a suggestion
        #[arg(long, default_value_t = crate::templates::DEFAULT_MIN_SEARCH_SIMILARITY)]
        min_score: f64,
    },

    /// Seed the cache with every gallery template prompt
    Preload,

    /// Print cache analytics
    Analytics,
}

/// Cache tunables exposed on the command line.
#[derive(Args, Debug, Clone)]
pub struct CacheOptions {
    /// Minimum similarity for a keyword-tier hit
    #[arg(long, global = true, default_value_t = 0.65)]
    pub min_similarity: f64,

    /// Weight of keyword overlap in the similarity score
    #[arg(long, global = true, default_value_t = 0.6)]
    pub keyword_weight: f64,

    /// Weight of raw word overlap in the similarity score
    #[arg(long, global = true, default_value_t = 0.4)]
    pub word_weight: f64,

    /// Entries kept in the in-process cache tier
    #[arg(long, global = true, default_value_t = 50)]
    pub memory_capacity: usize,

    /// Idle seconds before an in-process entry expires
    #[arg(long, global = true, default_value_t = 300)]
    pub memory_ttl: u64,

    /// Keyword candidates scored per lookup
    #[arg(long, global = true, default_value_t = 10)]
    pub candidate_limit: usize,
}

/// Where cache entries are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

/// Resolved configuration: CLI input merged with the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cache: CacheSettings,
    pub store: StoreLocation,
    /// Needed for any command that talks to Notion.
    pub notion_token: Option<ApiKey>,
    pub gallery_page: Option<PageId>,
    pub generator_url: Option<ValidatedUrl>,
    pub verbose: bool,
}

impl AppConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        let cache = CacheSettings::from_options(&cli.cache)?;

        let store = if cli.no_persist {
            StoreLocation::Memory
        } else {
            let path = cli
                .cache_path
                .clone()
                .or_else(|| env_var(ENV_CACHE_PATH).map(PathBuf::from))
                .unwrap_or_else(crate::store::JsonFileStore::default_path);
            StoreLocation::File(path)
        };

        let notion_token = env_var(ENV_NOTION_TOKEN).map(ApiKey::new).transpose()?;
        let gallery_page = env_var(ENV_GALLERY_PAGE_ID)
            .map(|id| PageId::parse(&id))
            .transpose()?;
        let generator_url = env_var(ENV_GENERATOR_URL)
            .map(|url| ValidatedUrl::parse(&url))
            .transpose()?;

        Ok(AppConfig {
            cache,
            store,
            notion_token,
            gallery_page,
            generator_url,
            verbose: cli.verbose,
        })
    }

    /// The Notion token, or the error explaining how to provide one.
    pub fn require_notion_token(&self) -> Result<&ApiKey, AppError> {
        self.notion_token
            .as_ref()
            .ok_or_else(|| missing_env(ENV_NOTION_TOKEN))
    }

    /// The explicit `--parent`, else the gallery page from the environment.
    pub fn parent_page(&self, explicit: Option<&str>) -> Result<PageId, AppError> {
        match explicit {
            Some(id) => Ok(PageId::parse(id)?),
            None => self.gallery_page.clone().ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "no --parent given and {} environment variable not set",
                    ENV_GALLERY_PAGE_ID
                ))
            }),
        }
    }
}

fn missing_env(name: &str) -> AppError {
    AppError::MissingConfiguration(format!("{} environment variable not set", name))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
