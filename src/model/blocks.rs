use serde::{Deserialize, Serialize};
use std::fmt;

/// Block type of a blueprint content block.
///
/// Known kinds get their own variant; anything else the generator emits is
/// kept by name and rendered as a plain rich-text block of that type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Callout,
    Divider,
    NumberedListItem,
    BulletedListItem,
    ToDo,
    Quote,
    Toggle,
    LinkedDatabase,
    Other(String),
}

impl BlockKind {
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Callout => "callout",
            BlockKind::Divider => "divider",
            BlockKind::NumberedListItem => "numbered_list_item",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::ToDo => "to_do",
            BlockKind::Quote => "quote",
            BlockKind::Toggle => "toggle",
            BlockKind::LinkedDatabase => "linked_database",
            BlockKind::Other(name) => name,
        }
    }
}

impl From<String> for BlockKind {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "heading_1" => BlockKind::Heading1,
            "heading_2" => BlockKind::Heading2,
            "heading_3" => BlockKind::Heading3,
            "paragraph" => BlockKind::Paragraph,
            "callout" => BlockKind::Callout,
            "divider" => BlockKind::Divider,
            "numbered_list_item" => BlockKind::NumberedListItem,
            "bulleted_list_item" => BlockKind::BulletedListItem,
            "to_do" => BlockKind::ToDo,
            "quote" => BlockKind::Quote,
            "toggle" => BlockKind::Toggle,
            "linked_database" => BlockKind::LinkedDatabase,
            other => BlockKind::Other(other.to_string()),
        }
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single content block on a blueprint page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Emoji for callout blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Database key this block links to (linked_database only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_database_source: Option<String>,
    /// View hints from the generator. Stored, not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_database_view: Option<serde_json::Value>,
}

impl BlockSpec {
    pub fn new(kind: BlockKind, content: Option<&str>) -> Self {
        Self {
            kind,
            content: content.map(str::to_string),
            icon: None,
            linked_database_source: None,
            linked_database_view: None,
        }
    }

    pub fn text(kind: BlockKind, content: &str) -> Self {
        Self::new(kind, Some(content))
    }

    pub fn divider() -> Self {
        Self::new(BlockKind::Divider, None)
    }

    pub fn callout(content: &str, icon: Option<&str>) -> Self {
        Self {
            icon: icon.map(str::to_string),
            ..Self::text(BlockKind::Callout, content)
        }
    }

    pub fn linked_database(source_key: &str) -> Self {
        Self {
            linked_database_source: Some(source_key.to_string()),
            ..Self::new(BlockKind::LinkedDatabase, None)
        }
    }
}
