//! Sync Report Types
//!
//! The structured result of a run that got as far as writing. Run-level failures are
//! returned as `SyncError` instead.

use crate::error::SinkError;
use crate::source::types::PageFailure;

use uuid::Uuid;

/// Overall result of a run that reached the write stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Every page was fetched and every partition was written.
    Completed,
    /// At least one page or partition failed. Everything else was still attempted.
    CompletedWithErrors,
}

/// Result of writing one partition.
#[derive(Debug)]
pub struct PartitionOutcome {
    /// The discriminator value (or the configured index name in single-index mode).
    pub key: String,
    /// Destination index, `None` if the key could not be resolved to a name.
    pub index_name: Option<String>,
    /// Records routed to this partition.
    pub records: usize,
    /// Records written, or the error that stopped this partition.
    pub result: Result<usize, SinkError>,
}

impl PartitionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct SyncReport {
    pub run_id: Uuid,
    /// Entry count reported by the probe.
    pub total: u64,
    pub pages_planned: u32,
    pub pages_fetched: usize,
    /// Pages skipped under the partial-collection policy.
    pub failed_pages: Vec<PageFailure>,
    /// Records extracted from the fetched pages.
    pub records: usize,
    pub partitions: Vec<PartitionOutcome>,
}

impl SyncReport {
    pub fn status(&self) -> SyncStatus {
        if self.failed_pages.is_empty() && self.partitions.iter().all(|p| p.is_success()) {
            SyncStatus::Completed
        } else {
            SyncStatus::CompletedWithErrors
        }
    }

    /// Records acknowledged by the search service across all partitions.
    pub fn written(&self) -> usize {
        self.partitions
            .iter()
            .filter_map(|p| p.result.as_ref().ok())
            .sum()
    }

    /// Partitions whose write failed, with the triggering error.
    pub fn failures(&self) -> impl Iterator<Item = (&PartitionOutcome, &SinkError)> {
        self.partitions
            .iter()
            .filter_map(|p| p.result.as_ref().err().map(|err| (p, err)))
    }

    pub fn partition(&self, key: &str) -> Option<&PartitionOutcome> {
        self.partitions.iter().find(|p| p.key == key)
    }
}
