//! Storyblok -> Algolia Content Indexer
//!
//! This library crate synchronizes content entries from a headless CMS into a hosted
//! search index. It is invoked programmatically by a host process (see `main.rs` for the
//! minimal one) and keeps no state between runs: each run re-reads and re-writes everything.
//!
//! ## Architecture Modules
//! - **`config`**: Credentials, query options, routing mode and failure policies.
//! - **`source`**: The paginated content source: page-count probe and concurrent page fan-out.
//! - **`records`**: Record extraction, optional numeric normalization and partitioning.
//! - **`sink`**: Batch upserts into the search service, with write acknowledgment.
//! - **`pipeline`**: The run orchestration and its structured `SyncReport`.
//! - **`error`**: The error taxonomy shared by all of the above.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod records;
pub mod sink;
pub mod source;

#[cfg(test)]
mod test_support;

pub use config::types::SyncConfig;
pub use error::SyncError;
pub use pipeline::sync::SyncPipeline;
pub use pipeline::types::{SyncReport, SyncStatus};
