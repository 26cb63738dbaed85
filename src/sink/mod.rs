//! Search Index Module
//!
//! Writes partitions into the hosted search service.
//!
//! ## Guarantees
//! - **No generated identifiers**: a record without `objectID` fails its whole batch before
//!   any request.
//! - **Acknowledged writes**: `save_objects` only returns once the service reports the write
//!   as published.
//! - **No retries**: a failed request is reported as-is to the caller.
//!
//! ## Submodules
//! - **`client`**: The `SearchIndex` trait, batch validation and the Algolia HTTP client.
//! - **`types`**: Wire DTOs for batch writes and task status.

pub mod client;
pub mod types;
