//! Record Types

/// One destination record: the content payload of a single entry.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Primary key field of every record in the search index.
pub const OBJECT_ID_FIELD: &str = "objectID";

/// Returns the record's identifier if it is a non-empty string.
pub fn object_id(record: &Record) -> Option<&str> {
    record
        .get(OBJECT_ID_FIELD)
        .and_then(|value| value.as_str())
        .filter(|id| !id.is_empty())
}
