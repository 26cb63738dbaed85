//! Sync Pipeline Module
//!
//! Ties the content source, record processing and the search index together into a
//! single run.
//!
//! ## Data Flow
//! content source -> page-count probe -> N concurrent page fetches -> record extraction
//! -> (optional) normalization -> partition by discriminator -> per-partition batch write
//! -> per-partition outcome in the `SyncReport`.
//!
//! ## Submodules
//! - **`sync`**: `SyncPipeline` and the run orchestration.
//! - **`types`**: `SyncReport`, `PartitionOutcome` and `SyncStatus`.

pub mod sync;
pub mod types;
