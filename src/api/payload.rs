// src/api/payload.rs
//! Request bodies for Notion object creation.
//!
//! The builder speaks in `BlockPayload` and `PropertySpec` values; this module
//! is the only place that knows their Notion JSON shape.

use crate::model::{PropertyKind, PropertySpec};
use crate::types::{DatabaseId, PageId};
use indexmap::IndexMap;
use serde_json::{json, Value};

/// A block ready to be appended to a Notion page.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockPayload {
    /// Link to a database created earlier in the same build.
    LinkToDatabase { database_id: DatabaseId },
    Divider,
    Callout { text: Option<String>, icon: String },
    /// Any other block type, carrying at most one rich-text run.
    Text {
        block_type: String,
        text: Option<String>,
    },
}

impl BlockPayload {
    pub fn paragraph(text: &str) -> Self {
        BlockPayload::Text {
            block_type: "paragraph".to_string(),
            text: Some(text.to_string()),
        }
    }

    pub fn text(block_type: &str, text: &str) -> Self {
        BlockPayload::Text {
            block_type: block_type.to_string(),
            text: Some(text.to_string()),
        }
    }

    /// Notion block type name.
    pub fn block_type(&self) -> &str {
        match self {
            BlockPayload::LinkToDatabase { .. } => "link_to_page",
            BlockPayload::Divider => "divider",
            BlockPayload::Callout { .. } => "callout",
            BlockPayload::Text { block_type, .. } => block_type,
        }
    }

    /// The text carried by this block, if any.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            BlockPayload::Callout { text, .. } | BlockPayload::Text { text, .. } => text.as_deref(),
            BlockPayload::LinkToDatabase { .. } | BlockPayload::Divider => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            BlockPayload::LinkToDatabase { database_id } => json!({
                "object": "block",
                "type": "link_to_page",
                "link_to_page": {
                    "type": "database_id",
                    "database_id": database_id.to_dashed(),
                }
            }),
            BlockPayload::Divider => json!({
                "object": "block",
                "type": "divider",
                "divider": {}
            }),
            BlockPayload::Callout { text, icon } => json!({
                "object": "block",
                "type": "callout",
                "callout": {
                    "rich_text": rich_text(text.as_deref()),
                    "icon": { "type": "emoji", "emoji": icon },
                }
            }),
            BlockPayload::Text { block_type, text } => {
                let mut block = serde_json::Map::new();
                block.insert("object".to_string(), json!("block"));
                block.insert("type".to_string(), json!(block_type));
                block.insert(
                    block_type.clone(),
                    json!({ "rich_text": rich_text(text.as_deref()) }),
                );
                Value::Object(block)
            }
        }
    }
}

/// A single plain-text run, or an empty array when there is no content.
pub fn rich_text(content: Option<&str>) -> Value {
    match content {
        Some(text) => json!([{ "type": "text", "text": { "content": text } }]),
        None => json!([]),
    }
}

/// Typed-property configuration for `POST /databases`.
///
/// Every kind is matched explicitly; option-bearing kinds carry their
/// choices verbatim, the rest an empty configuration object.
pub fn property_schema(spec: &PropertySpec) -> Value {
    let config = match spec.kind {
        PropertyKind::Select | PropertyKind::MultiSelect => {
            let options: Vec<Value> = spec
                .choices()
                .iter()
                .map(|name| json!({ "name": name }))
                .collect();
            json!({ "options": options })
        }
        PropertyKind::Title
        | PropertyKind::Text
        | PropertyKind::Number
        | PropertyKind::Date
        | PropertyKind::Checkbox
        | PropertyKind::Url
        | PropertyKind::Email
        | PropertyKind::Phone
        | PropertyKind::Status => json!({}),
    };
    let mut schema = serde_json::Map::new();
    schema.insert(spec.kind.notion_type().to_string(), config);
    Value::Object(schema)
}

pub fn database_properties(properties: &IndexMap<String, PropertySpec>) -> Value {
    let schema: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, spec)| (name.clone(), property_schema(spec)))
        .collect();
    Value::Object(schema)
}

fn emoji_icon(icon: Option<&str>) -> Value {
    match icon {
        Some(emoji) => json!({ "type": "emoji", "emoji": emoji }),
        None => Value::Null,
    }
}

fn children(blocks: &[BlockPayload]) -> Vec<Value> {
    blocks.iter().map(BlockPayload::to_json).collect()
}

/// Body for a page under another page.
pub fn page_body(
    parent: &PageId,
    title: &str,
    icon: Option<&str>,
    blocks: &[BlockPayload],
) -> Value {
    let mut body = json!({
        "parent": { "type": "page_id", "page_id": parent.to_dashed() },
        "properties": {
            "title": { "title": rich_text(Some(title)) }
        },
        "children": children(blocks),
    });
    if icon.is_some() {
        body["icon"] = emoji_icon(icon);
    }
    body
}

/// Body for a row in a database; `title_property` names the row-name column.
pub fn row_body(
    database: &DatabaseId,
    title_property: &str,
    title: &str,
    blocks: &[BlockPayload],
) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        title_property.to_string(),
        json!({ "title": rich_text(Some(title)) }),
    );
    json!({
        "parent": { "type": "database_id", "database_id": database.to_dashed() },
        "properties": properties,
        "children": children(blocks),
    })
}

pub fn database_body(
    parent: &PageId,
    title: &str,
    description: Option<&str>,
    properties: &IndexMap<String, PropertySpec>,
) -> Value {
    let mut body = json!({
        "parent": { "type": "page_id", "page_id": parent.to_dashed() },
        "title": rich_text(Some(title)),
        "properties": database_properties(properties),
        "is_inline": true,
    });
    if let Some(description) = description {
        body["description"] = rich_text(Some(description));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn select_options_are_carried_verbatim() {
        let spec = PropertySpec::with_options(PropertyKind::Select, ["Not Started", "Done"]);
        assert_eq!(
            property_schema(&spec),
            json!({ "select": { "options": [{ "name": "Not Started" }, { "name": "Done" }] } })
        );
    }

    #[test]
    fn plain_kinds_use_notion_names_and_empty_config() {
        assert_eq!(
            property_schema(&PropertySpec::new(PropertyKind::Text)),
            json!({ "rich_text": {} })
        );
        assert_eq!(
            property_schema(&PropertySpec::new(PropertyKind::Phone)),
            json!({ "phone_number": {} })
        );
        // options on a non-select kind are ignored
        let spec = PropertySpec::with_options(PropertyKind::Title, ["ignored"]);
        assert_eq!(property_schema(&spec), json!({ "title": {} }));
    }

    #[test]
    fn database_properties_keep_declaration_order() {
        let mut properties = IndexMap::new();
        properties.insert("Name".to_string(), PropertySpec::new(PropertyKind::Title));
        properties.insert("Done".to_string(), PropertySpec::new(PropertyKind::Checkbox));
        properties.insert("Due".to_string(), PropertySpec::new(PropertyKind::Date));

        let schema = database_properties(&properties);
        let names: Vec<&String> = schema.as_object().unwrap().keys().collect();
        assert_eq!(names, vec!["Name", "Done", "Due"]);
    }

    #[test]
    fn text_block_without_content_has_empty_rich_text() {
        let block = BlockPayload::Text {
            block_type: "heading_2".to_string(),
            text: None,
        };
        assert_eq!(
            block.to_json(),
            json!({ "object": "block", "type": "heading_2", "heading_2": { "rich_text": [] } })
        );
    }

    #[test]
    fn database_link_uses_dashed_id() {
        let database_id = DatabaseId::parse("0123456789abcdef0123456789abcdef").unwrap();
        let json = BlockPayload::LinkToDatabase { database_id }.to_json();
        assert_eq!(
            json["link_to_page"]["database_id"],
            json!("01234567-89ab-cdef-0123-456789abcdef")
        );
    }

    #[test]
    fn row_body_names_the_title_column() {
        let database_id = DatabaseId::parse("0123456789abcdef0123456789abcdef").unwrap();
        let body = row_body(&database_id, "Habit", "First entry", &[]);
        assert_eq!(
            body["properties"]["Habit"]["title"][0]["text"]["content"],
            json!("First entry")
        );
    }
}
