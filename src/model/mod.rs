//! The blueprint document: the structured description of a workspace that is
//! cached by prompt and later materialized in Notion.

pub mod blocks;
pub mod properties;

pub use blocks::{BlockKind, BlockSpec};
pub use properties::{PropertyKind, PropertySpec};

use crate::types::ValidationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A complete workspace description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub databases: Vec<DatabaseSpec>,
    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

/// A database to create under the root page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    /// Build-local cross reference token used by `linked_database` blocks.
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Columns in declaration order.
    #[serde(default)]
    pub properties: IndexMap<String, PropertySpec>,
}

impl DatabaseSpec {
    /// Name of the first property of kind `title`, the row-name column.
    pub fn title_property(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, spec)| spec.kind == PropertyKind::Title)
            .map(|(name, _)| name.as_str())
    }
}

/// A content page to create under the root page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
}

impl Blueprint {
    pub fn database(&self, key: &str) -> Option<&DatabaseSpec> {
        self.databases.iter().find(|db| db.key == key)
    }

    /// Checks the structural invariants a blueprint must satisfy before it
    /// is stored for reuse.
    ///
    /// A database without any title property is accepted; the builder skips
    /// its placeholder row.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }

        let mut keys = HashSet::new();
        for db in &self.databases {
            if !keys.insert(db.key.as_str()) {
                return Err(ValidationError::DuplicateDatabaseKey(db.key.clone()));
            }

            let title_count = db
                .properties
                .values()
                .filter(|spec| spec.kind == PropertyKind::Title)
                .count();
            if title_count > 1 {
                return Err(ValidationError::MultipleTitleProperties {
                    database: db.title.clone(),
                    count: title_count,
                });
            }

            for (name, spec) in &db.properties {
                if spec.kind.has_options() && spec.options.is_none() {
                    return Err(ValidationError::MissingOptions {
                        database: db.title.clone(),
                        property: name.clone(),
                        kind: spec.kind.to_string(),
                    });
                }
            }
        }

        for page in &self.pages {
            for block in &page.blocks {
                if block.kind != BlockKind::LinkedDatabase {
                    continue;
                }
                let key = block.linked_database_source.as_deref().unwrap_or_default();
                if !keys.contains(key) {
                    return Err(ValidationError::UnresolvedDatabaseLink {
                        page: page.title.clone(),
                        key: key.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn habit_blueprint() -> Blueprint {
        serde_json::from_value(serde_json::json!({
            "title": "Habit Tracker",
            "description": "Track your daily habits",
            "icon": "✅",
            "databases": [{
                "key": "habits_db",
                "title": "Habits",
                "properties": {
                    "Name": {"type": "title"},
                    "Frequency": {"type": "select", "options": ["Daily", "Weekly"]},
                    "Done": {"type": "checkbox"}
                }
            }],
            "pages": [{
                "title": "Dashboard",
                "blocks": [
                    {"type": "heading_1", "content": "Welcome"},
                    {"type": "linked_database", "linked_database_source": "habits_db"}
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn parses_generator_output() {
        let blueprint = habit_blueprint();
        assert_eq!(blueprint.databases.len(), 1);
        let names: Vec<_> = blueprint.databases[0].properties.keys().cloned().collect();
        assert_eq!(names, vec!["Name", "Frequency", "Done"]);
        assert_eq!(blueprint.databases[0].title_property(), Some("Name"));
        assert!(blueprint.validate().is_ok());
    }

    #[test]
    fn broken_link_fails_validation() {
        let mut blueprint = habit_blueprint();
        blueprint.pages[0]
            .blocks
            .push(BlockSpec::linked_database("missing_db"));
        assert_eq!(
            blueprint.validate(),
            Err(ValidationError::UnresolvedDatabaseLink {
                page: "Dashboard".to_string(),
                key: "missing_db".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_keys_fail_validation() {
        let mut blueprint = habit_blueprint();
        let copy = blueprint.databases[0].clone();
        blueprint.databases.push(copy);
        assert!(matches!(
            blueprint.validate(),
            Err(ValidationError::DuplicateDatabaseKey(_))
        ));
    }

    #[test]
    fn select_without_options_fails_validation() {
        let mut blueprint = habit_blueprint();
        blueprint.databases[0]
            .properties
            .insert("Mood".to_string(), PropertySpec::new(PropertyKind::Select));
        assert!(matches!(
            blueprint.validate(),
            Err(ValidationError::MissingOptions { .. })
        ));
    }

    #[test]
    fn missing_title_property_is_allowed() {
        let mut blueprint = habit_blueprint();
        blueprint.databases[0].properties.shift_remove("Name");
        assert_eq!(blueprint.databases[0].title_property(), None);
        assert!(blueprint.validate().is_ok());
    }
}
