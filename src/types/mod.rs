use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Duplicate database key '{0}' in blueprint")]
    DuplicateDatabaseKey(String),

    #[error("Page '{page}' links to unknown database key '{key}'")]
    UnresolvedDatabaseLink { page: String, key: String },

    #[error("Database '{database}' declares {count} title properties, expected at most one")]
    MultipleTitleProperties { database: String, count: usize },

    #[error("Property '{property}' in database '{database}' is a {kind} but has no options")]
    MissingOptions {
        database: String,
        property: String,
        kind: String,
    },

    #[error("Value out of bounds: {name} = {value}, expected {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
