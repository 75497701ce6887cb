//! Typed database property specifications.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of property kinds a blueprint database may declare.
///
/// Blueprints written by the generator sometimes use Notion's own names
/// (`rich_text`, `phone_number`); those are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    #[serde(alias = "rich_text")]
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Checkbox,
    Url,
    Email,
    #[serde(alias = "phone_number")]
    Phone,
    Status,
}

impl PropertyKind {
    /// The property type name used by the Notion API.
    pub fn notion_type(self) -> &'static str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::Text => "rich_text",
            PropertyKind::Number => "number",
            PropertyKind::Select => "select",
            PropertyKind::MultiSelect => "multi_select",
            PropertyKind::Date => "date",
            PropertyKind::Checkbox => "checkbox",
            PropertyKind::Url => "url",
            PropertyKind::Email => "email",
            PropertyKind::Phone => "phone_number",
            PropertyKind::Status => "status",
        }
    }

    /// Whether this kind carries a list of named choices.
    pub fn has_options(self) -> bool {
        matches!(self, PropertyKind::Select | PropertyKind::MultiSelect)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notion_type())
    }
}

/// One column of a blueprint database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    /// Choice names; required for select/multi_select, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl PropertySpec {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            options: None,
        }
    }

    pub fn with_options<I, S>(kind: PropertyKind, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            options: Some(options.into_iter().map(Into::into).collect()),
        }
    }

    /// The choices that apply to this property, empty for kinds without options.
    pub fn choices(&self) -> &[String] {
        if self.kind.has_options() {
            self.options.as_deref().unwrap_or_default()
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notion_aliases_deserialize_to_canonical_kinds() {
        let spec: PropertySpec = serde_json::from_str(r#"{"type": "rich_text"}"#).unwrap();
        assert_eq!(spec.kind, PropertyKind::Text);
        let spec: PropertySpec = serde_json::from_str(r#"{"type": "phone_number"}"#).unwrap();
        assert_eq!(spec.kind, PropertyKind::Phone);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(serde_json::from_str::<PropertySpec>(r#"{"type": "formula"}"#).is_err());
    }

    #[test]
    fn options_are_ignored_for_plain_kinds() {
        let spec = PropertySpec::with_options(PropertyKind::Date, ["a", "b"]);
        assert!(spec.choices().is_empty());

        let spec = PropertySpec::with_options(PropertyKind::Select, ["High", "Low"]);
        assert_eq!(spec.choices(), ["High".to_string(), "Low".to_string()]);
    }
}
