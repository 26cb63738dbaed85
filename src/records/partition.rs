//! Partitioning & Index Routing
//!
//! Groups records by a discriminator value and resolves each group's destination index.
//!
//! ## Index Names
//! Partition keys are authored content (e.g. a Storyblok component name) and are used as
//! index names directly. Whether that is safe depends on the `IndexNamePolicy`:
//! - **`Verbatim`**: pass through unchanged. Unsafe characters reach the search service as-is.
//! - **`Reject`**: the partition fails with `SinkError::InvalidIndexName`.
//! - **`Sanitize`**: unsafe characters are replaced by `_`.
//!
//! An explicit mapping table entry always takes precedence over the policy.
//!
//! Every partition must own its destination. When two keys resolve to the same name
//! (`"blog post"` and `"blog_post"` under `Sanitize`, or a mapping onto another key's
//! name), all of them fail with `SinkError::IndexNameCollision` and nothing is merged.

use super::types::{Record, object_id};
use crate::config::types::IndexNamePolicy;
use crate::error::{PartitionError, SinkError};

use regex::Regex;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::OnceLock;

fn unsafe_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("index name pattern is valid"))
}

/// Process-local mapping from partition key to the records collected for it.
///
/// Built by a single task and fully populated before any write starts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionTable {
    partitions: BTreeMap<String, Vec<Record>>,
}

impl PartitionTable {
    /// Groups `records` by the string value of `field`, preserving record order per key.
    ///
    /// Fails on the first record whose discriminator is missing or not a string.
    pub fn partition_by(records: Vec<Record>, field: &str) -> Result<Self, PartitionError> {
        let mut partitions: BTreeMap<String, Vec<Record>> = BTreeMap::new();

        for record in records {
            let key = match record.get(field).and_then(|value| value.as_str()) {
                Some(key) => key.to_string(),
                None => {
                    return Err(PartitionError::MissingDiscriminator {
                        field: field.to_string(),
                        object_id: object_id(&record).unwrap_or_default().to_string(),
                    });
                }
            };
            partitions.entry(key).or_default().push(record);
        }

        Ok(Self { partitions })
    }

    /// Places every record in one partition keyed by `index_name`.
    pub fn single(index_name: &str, records: Vec<Record>) -> Self {
        let mut partitions = BTreeMap::new();
        if !records.is_empty() {
            partitions.insert(index_name.to_string(), records);
        }
        Self { partitions }
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&[Record]> {
        self.partitions.get(key).map(|records| records.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.partitions.keys().map(|key| key.as_str())
    }

    /// Total number of records across all partitions.
    pub fn record_count(&self) -> usize {
        self.partitions.values().map(|records| records.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.partitions
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
    }
}

impl IntoIterator for PartitionTable {
    type Item = (String, Vec<Record>);
    type IntoIter = btree_map::IntoIter<String, Vec<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.partitions.into_iter()
    }
}

/// Resolves partition keys to destination index names.
#[derive(Debug, Clone, Default)]
pub struct IndexRouter {
    map: BTreeMap<String, String>,
    policy: IndexNamePolicy,
}

impl IndexRouter {
    pub fn new(map: BTreeMap<String, String>, policy: IndexNamePolicy) -> Self {
        Self { map, policy }
    }

    pub fn resolve(&self, key: &str) -> Result<String, SinkError> {
        let name = match self.map.get(key) {
            Some(mapped) => mapped.clone(),
            None => match self.policy {
                IndexNamePolicy::Verbatim => key.to_string(),
                IndexNamePolicy::Reject => {
                    if unsafe_chars().is_match(key) {
                        return Err(SinkError::InvalidIndexName(key.to_string()));
                    }
                    key.to_string()
                }
                IndexNamePolicy::Sanitize => unsafe_chars().replace_all(key, "_").into_owned(),
            },
        };

        if name.trim().is_empty() {
            return Err(SinkError::InvalidIndexName(name));
        }
        Ok(name)
    }

    /// Resolves every key up front, in input order, and fails all keys sharing a name.
    pub fn resolve_all<'a, K>(&self, keys: K) -> Vec<Result<String, SinkError>>
    where
        K: IntoIterator<Item = &'a str>,
    {
        let keys: Vec<&str> = keys.into_iter().collect();
        let resolved: Vec<Result<String, SinkError>> =
            keys.iter().map(|key| self.resolve(key)).collect();

        let mut owners: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (key, name) in keys.iter().zip(&resolved) {
            if let Ok(name) = name {
                owners.entry(name.as_str()).or_default().push(key.to_string());
            }
        }

        let collisions: BTreeMap<String, Vec<String>> = owners
            .into_iter()
            .filter(|(_, keys)| keys.len() > 1)
            .map(|(name, keys)| (name.to_string(), keys))
            .collect();

        resolved
            .into_iter()
            .map(|result| match result {
                Ok(name) => match collisions.get(&name) {
                    Some(keys) => Err(SinkError::IndexNameCollision {
                        index: name,
                        keys: keys.clone(),
                    }),
                    None => Ok(name),
                },
                Err(error) => Err(error),
            })
            .collect()
    }
}
