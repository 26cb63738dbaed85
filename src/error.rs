//! Error Types
//!
//! Every failure the indexer can hit is reported through one of these enums so that a
//! host application can react programmatically instead of scraping log output.
//!
//! ## Taxonomy
//! - **`SourceError`**: a single read against the content source failed.
//! - **`SinkError`**: a write against one destination index failed. Isolated per partition.
//! - **`PartitionError`**: records could not be routed to a partition.
//! - **`ConfigError`**: construction-time configuration is missing or malformed.
//! - **`SyncError`**: run-level failures that abort the whole sync before any write.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("content source request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content source returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("content source response has no `total` header")]
    MissingTotal,

    #[error("content source returned a malformed `total` header: {0:?}")]
    InvalidTotal(String),

    #[error("failed to decode content source response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("search index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search index returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("record at position {position} for index {index:?} has no objectID")]
    MissingObjectId { index: String, position: usize },

    #[error("objectID {object_id:?} appears more than once in the batch for index {index:?}")]
    DuplicateObjectId { index: String, object_id: String },

    #[error("invalid index name {0:?}")]
    InvalidIndexName(String),

    #[error("index {index:?} is the destination of several partitions: {keys:?}")]
    IndexNameCollision { index: String, keys: Vec<String> },

    #[error("failed to decode search index response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("record {object_id:?} has no string discriminator field {field:?}")]
    MissingDiscriminator { field: String, object_id: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("page-count probe failed: {0}")]
    Probe(#[source] SourceError),

    #[error("fetching page {page} failed: {source}")]
    PageFetch {
        page: u32,
        #[source]
        source: SourceError,
    },

    #[error("partitioning failed: {0}")]
    Partition(#[from] PartitionError),
}
