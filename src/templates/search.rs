//! Gallery search: substring matches first, then scored suggestions.

use super::{TemplateMetadata, TemplateRegistry};
use crate::prompt::normalize;
use serde::Serialize;
use std::collections::BTreeSet;

/// Lowest score a template needs to be suggested.
pub const DEFAULT_MIN_SEARCH_SIMILARITY: f64 = 0.3;

/// Suggestions returned next to the exact matches.
const SUGGESTION_LIMIT: usize = 6;

const PARTIAL_MATCH_THRESHOLD: f64 = 0.7;
const SYNONYM_CREDIT: f64 = 0.8;
const PREFIX_CREDIT: f64 = 0.5;

/// Search vocabulary. Broader than the cache taxonomy: it also folds
/// gallery words such as "planner" and "track".
const SEARCH_SYNONYMS: &[(&str, &[&str])] = &[
    ("project", &["projects", "task", "tasks", "todo", "todos", "work", "kanban", "management"]),
    ("habit", &["habits", "routine", "routines", "daily", "tracker", "streak", "practice"]),
    (
        "goal",
        &[
            "goals",
            "objective",
            "objectives",
            "target",
            "targets",
            "okr",
            "milestone",
            "achievement",
        ],
    ),
    (
        "budget",
        &["budgets", "money", "finance", "finances", "expense", "expenses", "income", "spending"],
    ),
    (
        "workout",
        &["workouts", "exercise", "exercises", "fitness", "gym", "training", "health", "lift"],
    ),
    (
        "meal",
        &[
            "meals",
            "food",
            "recipe",
            "recipes",
            "cooking",
            "diet",
            "nutrition",
            "calories",
            "eating",
        ],
    ),
    (
        "crm",
        &["customer", "customers", "client", "clients", "sales", "leads", "pipeline", "contacts"],
    ),
    (
        "content",
        &[
            "blog",
            "blogs",
            "writing",
            "article",
            "articles",
            "post",
            "posts",
            "editorial",
            "publish",
        ],
    ),
    (
        "study",
        &["studies", "learning", "course", "courses", "education", "class", "notes", "school"],
    ),
    (
        "travel",
        &[
            "trip",
            "trips",
            "vacation",
            "vacations",
            "itinerary",
            "journey",
            "destination",
            "packing",
        ],
    ),
    ("reading", &["books", "book", "library", "read"]),
    ("journal", &["journaling", "diary", "gratitude", "reflection", "mood", "log"]),
    ("inventory", &["stock", "warehouse", "products", "catalog", "assets"]),
    ("meeting", &["meetings", "agenda", "notes", "minutes", "standup"]),
    ("sprint", &["sprints", "agile", "scrum", "backlog"]),
    ("team", &["teams", "collaboration", "employee", "employees", "staff"]),
    ("personal", &["life", "self", "individual", "private"]),
    ("planner", &["planning", "plan", "schedule", "calendar", "organize"]),
    ("track", &["tracker", "tracking", "monitor", "log", "record"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// The query text appears in the name, description or a tag.
    Exact,
    Partial,
    Similar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub template: &'a TemplateMetadata,
    pub similarity: f64,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults<'a> {
    pub exact_matches: Vec<SearchHit<'a>>,
    /// Best scored templates that are not exact matches, highest first.
    pub similar_suggestions: Vec<SearchHit<'a>>,
}

impl SearchResults<'_> {
    pub fn has_exact_matches(&self) -> bool {
        !self.exact_matches.is_empty()
    }
}

impl TemplateRegistry {
    /// Searches the gallery, optionally within one category.
    ///
    /// An empty query lists every template of the category as an exact match.
    pub fn search(
        &self,
        query: &str,
        category: Option<&str>,
        min_similarity: f64,
    ) -> SearchResults<'_> {
        let in_category = |template: &&TemplateMetadata| {
            category.map_or(true, |c| template.category.eq_ignore_ascii_case(c))
        };

        if query.trim().is_empty() {
            return SearchResults {
                exact_matches: self
                    .all()
                    .iter()
                    .filter(in_category)
                    .map(|template| SearchHit {
                        template,
                        similarity: 1.0,
                        match_type: MatchType::Exact,
                    })
                    .collect(),
                similar_suggestions: Vec::new(),
            };
        }

        let needle = query.to_lowercase();
        let keywords = query_keywords(query);
        let mut exact_matches = Vec::new();
        let mut scored = Vec::new();

        for template in self.all().iter().filter(in_category) {
            if contains_query(template, &needle) {
                exact_matches.push(SearchHit {
                    template,
                    similarity: 1.0,
                    match_type: MatchType::Exact,
                });
            }

            let similarity = template_similarity(&keywords, template);
            if similarity >= min_similarity {
                let match_type = if similarity >= PARTIAL_MATCH_THRESHOLD {
                    MatchType::Partial
                } else {
                    MatchType::Similar
                };
                scored.push(SearchHit {
                    template,
                    similarity,
                    match_type,
                });
            }
        }

        // stable: equal scores keep catalog order
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        let similar_suggestions = scored
            .into_iter()
            .filter(|hit| !exact_matches.iter().any(|e| e.template.id == hit.template.id))
            .take(SUGGESTION_LIMIT)
            .collect();

        log::debug!(
            "Template search '{}': {} exact matches",
            query,
            exact_matches.len()
        );
        SearchResults {
            exact_matches,
            similar_suggestions,
        }
    }
}

fn contains_query(template: &TemplateMetadata, needle: &str) -> bool {
    template.name.to_lowercase().contains(needle)
        || template.description.to_lowercase().contains(needle)
        || template.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Query words of two or more characters plus the canonical term each
/// one maps to.
fn query_keywords(query: &str) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();
    for word in normalize(query).split(' ').filter(|w| w.len() >= 2) {
        keywords.insert(word.to_string());
        if let Some((canonical, _)) = SEARCH_SYNONYMS
            .iter()
            .find(|(canonical, synonyms)| *canonical == word || synonyms.contains(&word))
        {
            keywords.insert(canonical.to_string());
        }
    }
    keywords
}

/// Share of query keywords found in the template text. A direct substring
/// hit counts fully, a synonym hit 0.8, a word prefix hit 0.5.
fn template_similarity(keywords: &BTreeSet<String>, template: &TemplateMetadata) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let text = normalize(&format!(
        "{} {} {} {}",
        template.name,
        template.description,
        template.tags.join(" "),
        template.category
    ));

    let score: f64 = keywords
        .iter()
        .map(|keyword| {
            if text.contains(keyword.as_str()) {
                return 1.0;
            }
            let synonyms = SEARCH_SYNONYMS
                .iter()
                .find(|(canonical, _)| *canonical == keyword.as_str())
                .map_or(&[][..], |(_, synonyms)| *synonyms);
            if synonyms.iter().any(|synonym| text.contains(synonym)) {
                return SYNONYM_CREDIT;
            }
            let prefix = text
                .split(' ')
                .any(|word| word.starts_with(keyword.as_str()) || keyword.starts_with(word));
            if prefix {
                PREFIX_CREDIT
            } else {
                0.0
            }
        })
        .sum();
    score / keywords.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids<'a>(hits: &[SearchHit<'a>]) -> Vec<&'a str> {
        hits.iter().map(|hit| hit.template.id.as_str()).collect()
    }

    #[test]
    fn empty_query_lists_the_category() {
        let results = TemplateRegistry::curated().search("  ", Some("finance"), 0.3);
        assert_eq!(
            ids(&results.exact_matches),
            vec!["budget-tracker", "expense-tracker", "investment-tracker"]
        );
        assert!(results.similar_suggestions.is_empty());
    }

    #[test]
    fn query_text_in_name_or_tags_is_an_exact_match() {
        let results =
            TemplateRegistry::curated().search("Habit", None, DEFAULT_MIN_SEARCH_SIMILARITY);
        assert!(results.has_exact_matches());
        assert_eq!(ids(&results.exact_matches), vec!["habit-tracker"]);
        assert!(!ids(&results.similar_suggestions).contains(&"habit-tracker"));
    }

    #[test]
    fn synonyms_surface_related_templates() {
        let results =
            TemplateRegistry::curated().search("gym routine", None, DEFAULT_MIN_SEARCH_SIMILARITY);
        assert!(!results.has_exact_matches());

        let suggestions = ids(&results.similar_suggestions);
        assert_eq!(suggestions[0], "workout-tracker");
        assert!(suggestions.contains(&"habit-tracker"));
        assert!(suggestions.len() <= SUGGESTION_LIMIT);
        assert!(results
            .similar_suggestions
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity));
    }

    #[test]
    fn keywords_include_canonical_terms() {
        let keywords = query_keywords("my gym log");
        let expected: BTreeSet<String> = ["my", "gym", "workout", "log", "journal"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(keywords, expected);
    }

    #[test]
    fn unrelated_query_finds_nothing() {
        let results = TemplateRegistry::curated().search("zzz qqq", None, 0.3);
        assert!(!results.has_exact_matches());
        assert!(results.similar_suggestions.is_empty());
    }
}
