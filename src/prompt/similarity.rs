//! Weighted prompt similarity: curated keyword overlap blended with raw word overlap.

use super::keywords::KeywordTaxonomy;
use super::normalize::normalize;
use crate::types::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

/// Words of this length or shorter never count as content words.
const MAX_NOISE_WORD_LEN: usize = 2;

/// Relative weight of the keyword and word components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    pub keyword: f64,
    pub word: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            keyword: 0.6,
            word: 0.4,
        }
    }
}

impl SimilarityWeights {
    pub fn new(keyword: f64, word: f64) -> Result<Self, ValidationError> {
        for (name, value) in [("keyword_weight", keyword), ("word_weight", word)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    name,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        let total = keyword + word;
        if total <= 0.0 {
            return Err(ValidationError::OutOfRange {
                name: "keyword_weight + word_weight",
                value: total,
                min: f64::MIN_POSITIVE,
                max: 2.0,
            });
        }
        Ok(Self {
            keyword: keyword / total,
            word: word / total,
        })
    }
}

/// Scores prompt pairs in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct SimilarityScorer<'a> {
    taxonomy: &'a KeywordTaxonomy,
    weights: SimilarityWeights,
}

impl Default for SimilarityScorer<'static> {
    fn default() -> Self {
        Self::new(KeywordTaxonomy::standard(), SimilarityWeights::default())
    }
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(taxonomy: &'a KeywordTaxonomy, weights: SimilarityWeights) -> Self {
        Self { taxonomy, weights }
    }

    /// Weighted blend of keyword Jaccard and content-word Jaccard.
    ///
    /// A component whose union is empty on both sides carries no evidence
    /// and is left out, with the remaining weight renormalized. Symmetric,
    /// and `score(p, p) == 1.0` whenever `p` has a keyword or content word.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let keyword_sim = jaccard(&self.taxonomy.extract(a), &self.taxonomy.extract(b));
        let word_sim = jaccard(&content_words(a), &content_words(b));

        let mut weighted = 0.0;
        let mut weight = 0.0;
        if let Some(sim) = keyword_sim {
            weighted += self.weights.keyword * sim;
            weight += self.weights.keyword;
        }
        if let Some(sim) = word_sim {
            weighted += self.weights.word * sim;
            weight += self.weights.word;
        }

        if weight > 0.0 {
            (weighted / weight).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Similarity with the built-in taxonomy and default weights.
pub fn similarity(a: &str, b: &str) -> f64 {
    SimilarityScorer::default().score(a, b)
}

/// Normalized words longer than two characters, with a trailing plural `s` folded.
pub fn content_words(prompt: &str) -> BTreeSet<String> {
    normalize(prompt)
        .split(' ')
        .filter(|word| word.len() > MAX_NOISE_WORD_LEN)
        .map(fold_plural)
        .collect()
}

fn fold_plural(word: &str) -> String {
    match word.strip_suffix('s') {
        Some(stem) if word.len() > 3 && !stem.ends_with('s') => stem.to_string(),
        _ => word.to_string(),
    }
}

/// `|A ∩ B| / |A ∪ B|`, or `None` when both sets are empty.
fn jaccard<T: Eq + Hash + Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> Option<f64> {
    let union: HashSet<&T> = a.iter().chain(b.iter()).collect();
    if union.is_empty() {
        return None;
    }
    let intersection = a.intersection(b).count();
    Some(intersection as f64 / union.len() as f64)
}
