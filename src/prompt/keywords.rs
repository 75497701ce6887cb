//! Controlled vocabulary of domain keywords and the synonym table that feeds it.

use super::normalize::normalize;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

/// Canonical keyword → synonyms that map onto it.
///
/// A token may appear under several canonical keywords ("notes" belongs to
/// both study and meeting); it then contributes all of them.
const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("project", &["projects", "task", "tasks", "todo", "todos", "work", "kanban"]),
    ("habit", &["habits", "routine", "routines", "daily", "tracker", "streak"]),
    ("goal", &["goals", "objective", "objectives", "target", "targets", "okr", "milestone"]),
    ("budget", &["budgets", "money", "finance", "finances", "expense", "expenses", "income"]),
    ("workout", &["workouts", "exercise", "exercises", "fitness", "gym", "training", "health"]),
    ("meal", &["meals", "food", "recipe", "recipes", "cooking", "diet", "nutrition", "calories"]),
    ("crm", &["customer", "customers", "client", "clients", "sales", "leads", "pipeline"]),
    ("content", &["blog", "blogs", "writing", "article", "articles", "post", "posts", "editorial"]),
    ("study", &["studies", "learning", "course", "courses", "education", "class", "notes"]),
    ("travel", &["trip", "trips", "vacation", "vacations", "itinerary", "journey", "destination"]),
    ("reading", &["books", "book", "library"]),
    ("journal", &["journaling", "diary", "gratitude", "reflection", "mood"]),
    ("inventory", &["stock", "warehouse", "products", "catalog", "assets"]),
    ("meeting", &["meetings", "agenda", "notes", "minutes", "standup"]),
    ("sprint", &["sprints", "agile", "scrum", "backlog"]),
];

/// Category assigned to a cached blueprint, by first matching keyword group.
const CATEGORY_PRIORITY: &[(&[&str], &str)] = &[
    (&["project", "goal"], "productivity"),
    (&["budget"], "finance"),
    (&["workout", "meal"], "health"),
    (&["crm"], "business"),
    (&["content"], "content"),
    (&["study"], "education"),
    (&["travel"], "travel"),
];

const DEFAULT_CATEGORY: &str = "general";

static DEFAULT_TAXONOMY: Lazy<KeywordTaxonomy> =
    Lazy::new(|| KeywordTaxonomy::from_table(DEFAULT_SYNONYMS));

/// Token → canonical keyword lookup built from a synonym table.
#[derive(Debug, Clone)]
pub struct KeywordTaxonomy {
    index: HashMap<String, Vec<String>>,
}

impl KeywordTaxonomy {
    pub fn from_table(table: &[(&str, &[&str])]) -> Self {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for (canonical, synonyms) in table {
            for token in std::iter::once(canonical).chain(synonyms.iter()) {
                let entry = index.entry(token.to_string()).or_default();
                if !entry.iter().any(|c| c == canonical) {
                    entry.push(canonical.to_string());
                }
            }
        }
        Self { index }
    }

    /// The built-in taxonomy.
    pub fn standard() -> &'static KeywordTaxonomy {
        &DEFAULT_TAXONOMY
    }

    /// Canonical keywords found in `prompt`. Unmatched tokens are dropped.
    pub fn extract(&self, prompt: &str) -> BTreeSet<String> {
        normalize(prompt)
            .split(' ')
            .filter_map(|token| self.index.get(token))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn is_canonical(&self, keyword: &str) -> bool {
        self.index
            .get(keyword)
            .is_some_and(|canonicals| canonicals.iter().any(|c| c == keyword))
    }
}

/// Extracts canonical keywords with the built-in taxonomy.
pub fn extract_keywords(prompt: &str) -> BTreeSet<String> {
    KeywordTaxonomy::standard().extract(prompt)
}

/// Coarse category for a keyword set.
pub fn categorize(keywords: &BTreeSet<String>) -> &'static str {
    CATEGORY_PRIORITY
        .iter()
        .find(|(group, _)| group.iter().any(|k| keywords.contains(*k)))
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}
