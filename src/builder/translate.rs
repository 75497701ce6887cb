//! Blueprint blocks to Notion block payloads.

use crate::api::BlockPayload;
use crate::constants::{DATABASE_LINK_FALLBACK_TEXT, DEFAULT_CALLOUT_ICON, PLACEHOLDER_ICON};
use crate::model::{BlockKind, BlockSpec};
use crate::types::DatabaseId;
use indexmap::IndexMap;

/// Translates one block. `databases` maps the blueprint's database keys to
/// the ids created earlier in this build.
///
/// A `linked_database` whose key is not in `databases` degrades to a
/// fallback paragraph.
pub fn translate_block(
    block: &BlockSpec,
    databases: &IndexMap<String, DatabaseId>,
) -> BlockPayload {
    match &block.kind {
        BlockKind::LinkedDatabase => {
            let source = block.linked_database_source.as_deref();
            match source.and_then(|key| databases.get(key)) {
                Some(database_id) => BlockPayload::LinkToDatabase {
                    database_id: database_id.clone(),
                },
                None => {
                    log::warn!(
                        "Linked database '{}' was not created in this build, using fallback text",
                        source.unwrap_or_default()
                    );
                    BlockPayload::paragraph(DATABASE_LINK_FALLBACK_TEXT)
                }
            }
        }
        BlockKind::Divider => BlockPayload::Divider,
        BlockKind::Callout => BlockPayload::Callout {
            text: block.content.clone(),
            icon: block
                .icon
                .clone()
                .unwrap_or_else(|| DEFAULT_CALLOUT_ICON.to_string()),
        },
        other => BlockPayload::Text {
            block_type: other.as_str().to_string(),
            text: block.content.clone(),
        },
    }
}

pub fn translate_blocks(
    blocks: &[BlockSpec],
    databases: &IndexMap<String, DatabaseId>,
) -> Vec<BlockPayload> {
    blocks
        .iter()
        .map(|block| translate_block(block, databases))
        .collect()
}

/// Title of the starter row seeded into each new database.
pub fn placeholder_title(database_title: &str) -> String {
    format!("👉 Click to see how to use {}", database_title)
}

/// Body of the starter row: a short how-to for first-time users.
pub fn placeholder_blocks(database_title: &str) -> Vec<BlockPayload> {
    vec![
        BlockPayload::Callout {
            text: Some(format!(
                "This is a placeholder to help you get started with {}.",
                database_title
            )),
            icon: PLACEHOLDER_ICON.to_string(),
        },
        BlockPayload::text("heading_2", "How to use:"),
        BlockPayload::text("numbered_list_item", "Click '+ New' to add your first entry"),
        BlockPayload::text("numbered_list_item", "Fill in the properties with your data"),
        BlockPayload::text("numbered_list_item", "Delete this placeholder when ready"),
    ]
}
