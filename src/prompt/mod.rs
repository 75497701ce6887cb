//! Prompt analysis: normalization, fingerprinting, keyword extraction and
//! similarity scoring. Everything here is pure and deterministic.

pub mod keywords;
pub mod normalize;
pub mod similarity;

pub use keywords::{categorize, extract_keywords, KeywordTaxonomy};
pub use normalize::{normalize, PromptHash};
pub use similarity::{content_words, similarity, SimilarityScorer, SimilarityWeights};
