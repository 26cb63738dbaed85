//! Record Extraction
//!
//! Turns fetched stories into destination records. The identifier always comes from the
//! story envelope, never from the authored payload.

use super::types::{OBJECT_ID_FIELD, Record};
use crate::source::types::{StoriesPage, Story};

use serde_json::Value;

/// Extracts records from every page, in page order and then story order.
///
/// Consumes the pages so each payload is moved into its record rather than copied.
pub fn extract_records(pages: Vec<StoriesPage>) -> Vec<Record> {
    pages
        .into_iter()
        .flat_map(|page| page.stories)
        .filter_map(extract_record)
        .collect()
}

/// Extracts a single record. Stories without an object payload contribute nothing.
pub fn extract_record(story: Story) -> Option<Record> {
    let mut content = match story.content {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => {
            tracing::warn!("Story {} has no content, skipping", story.uuid);
            return None;
        }
        Some(other) => {
            tracing::warn!(
                "Story {} has non-object content ({}), skipping",
                story.uuid,
                type_name(&other)
            );
            return None;
        }
    };

    if story.uuid.is_empty() {
        // Leave the record without an identifier so its partition write fails.
        tracing::warn!("Story without uuid found, its record will carry no objectID");
        content.remove(OBJECT_ID_FIELD);
    } else {
        content.insert(
            OBJECT_ID_FIELD.to_string(),
            Value::String(story.uuid),
        );
    }

    Some(content)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
