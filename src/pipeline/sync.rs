//! Sync Pipeline
//!
//! Orchestrates one full run: probe, concurrent fetch, extraction, optional
//! normalization, partitioning and isolated per-partition writes.
//!
//! ## Suspension Points
//! - **Probe**: one read. Failure aborts the run.
//! - **Fetch**: join on all page reads. Failure handling follows the `FetchPolicy`.
//! - **Write**: join on all partition writes. Each write fails on its own.

use super::types::{PartitionOutcome, SyncReport, SyncStatus};
use crate::config::types::{SyncConfig, SyncMode};
use crate::error::{SinkError, SyncError};
use crate::records::extract::extract_records;
use crate::records::normalize::normalize_record;
use crate::records::partition::{IndexRouter, PartitionTable};
use crate::records::types::Record;
use crate::sink::client::{AlgoliaClient, SearchIndex};
use crate::source::client::{ContentSource, StoryblokClient};
use crate::source::pagination::{fetch_all_pages, probe_page_count};
use crate::source::types::FetchOutcome;

use futures::future::join_all;
use tracing::Instrument;
use uuid::Uuid;

pub struct SyncPipeline<S, I> {
    source: S,
    index: I,
    config: SyncConfig,
    router: IndexRouter,
}

impl SyncPipeline<StoryblokClient, AlgoliaClient> {
    /// Builds a pipeline backed by the HTTP clients for both collaborators.
    pub fn from_config(config: SyncConfig) -> Result<Self, SyncError> {
        config.validate()?;

        let source = StoryblokClient::new(&config.storyblok, config.request_timeout)
            .map_err(SyncError::Client)?;
        let index = AlgoliaClient::new(&config.algolia, config.request_timeout)
            .map_err(SyncError::Client)?;

        Ok(Self::new(source, index, config))
    }
}

impl<S, I> SyncPipeline<S, I>
where
    S: ContentSource,
    I: SearchIndex,
{
    pub fn new(source: S, index: I, config: SyncConfig) -> Self {
        let router = IndexRouter::new(config.index_name_map.clone(), config.index_name_policy);
        Self {
            source,
            index,
            config,
            router,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Runs one full synchronization.
    ///
    /// # Returns
    /// * `Ok(report)` once every partition write has settled, successful or not.
    /// * `Err` if the run was aborted before any write (config, probe, fetch, partitioning).
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync", run_id = %run_id);
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid) -> Result<SyncReport, SyncError> {
        self.config.validate()?;
        tracing::info!("Starting sync run {}", run_id);

        // 1. Page-count probe:
        let probe = probe_page_count(&self.source, &self.config.query).await?;

        // 2. Concurrent page fetch:
        let FetchOutcome { pages, failed } = fetch_all_pages(
            &self.source,
            &self.config.query,
            probe.page_count,
            self.config.fetch_policy,
        )
        .await?;
        let pages_fetched = pages.len();

        // 3. Extraction and optional normalization:
        let mut records = extract_records(pages);
        if self.config.normalize_numbers {
            let discriminator = self.config.discriminator();
            for record in records.iter_mut() {
                normalize_record(record, discriminator);
            }
        }
        let record_count = records.len();

        // 4. Partition table, fully built before any write:
        let table = match &self.config.mode {
            SyncMode::SingleIndex { index_name } => PartitionTable::single(index_name, records),
            SyncMode::ByDiscriminator { field } => PartitionTable::partition_by(records, field)?,
        };
        tracing::info!(
            "Collected {} records into {} partitions",
            table.record_count(),
            table.len()
        );

        // 5. Isolated per-partition writes:
        let partitions = self.write_partitions(table).await;

        let report = SyncReport {
            run_id,
            total: probe.total,
            pages_planned: probe.page_count,
            pages_fetched,
            failed_pages: failed,
            records: record_count,
            partitions,
        };

        match report.status() {
            SyncStatus::Completed => tracing::info!(
                "Sync run {} completed: {} records written to {} indices",
                run_id,
                report.written(),
                report.partitions.len()
            ),
            SyncStatus::CompletedWithErrors => tracing::warn!(
                "Sync run {} completed with errors: {} failed pages, {} failed partitions",
                run_id,
                report.failed_pages.len(),
                report.failures().count()
            ),
        }

        Ok(report)
    }

    async fn write_partitions(&self, table: PartitionTable) -> Vec<PartitionOutcome> {
        // Every destination is known before the first write starts.
        let routes = self.resolve_indices(&table);
        let writes = table
            .into_iter()
            .zip(routes)
            .map(|((key, records), route)| self.write_partition(key, route, records));
        join_all(writes).await
    }

    async fn write_partition(
        &self,
        key: String,
        route: Result<String, SinkError>,
        records: Vec<Record>,
    ) -> PartitionOutcome {
        let count = records.len();

        let index_name = match route {
            Ok(name) => name,
            Err(error) => {
                tracing::error!("Cannot route partition {:?}: {}", key, error);
                return PartitionOutcome {
                    key,
                    index_name: None,
                    records: count,
                    result: Err(error),
                };
            }
        };

        let result = self.index.save_objects(&index_name, &records).await;
        match &result {
            Ok(written) => tracing::info!("Index {} stored with {} entries.", index_name, written),
            Err(error) => tracing::error!("Failed to store index {}: {}", index_name, error),
        }

        PartitionOutcome {
            key,
            index_name: Some(index_name),
            records: count,
            result,
        }
    }

    fn resolve_indices(&self, table: &PartitionTable) -> Vec<Result<String, SinkError>> {
        match &self.config.mode {
            SyncMode::SingleIndex { index_name } => {
                table.keys().map(|_| Ok(index_name.clone())).collect()
            }
            SyncMode::ByDiscriminator { .. } => self.router.resolve_all(table.keys()),
        }
    }
}
