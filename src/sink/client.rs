//! Search Index Client
//!
//! The `SearchIndex` seam and its HTTP implementation against the Algolia REST API.
//!
//! ## Write Path
//! 1. **Validate**: every record must carry a unique, non-empty `objectID`. Nothing is sent
//!    otherwise.
//! 2. **Batch**: records are posted in chunks of `batch_size` as `updateObject` operations.
//! 3. **Wait**: each returned task is polled until it reports `published`.

use super::types::{BatchRequest, BatchResponse, TASK_PUBLISHED, TaskStatusResponse};
use crate::config::types::AlgoliaConfig;
use crate::error::SinkError;
use crate::records::types::{Record, object_id};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;

pub const HEADER_APPLICATION_ID: &str = "X-Algolia-Application-Id";
pub const HEADER_API_KEY: &str = "X-Algolia-API-Key";

/// Batch write access to named search indices.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Upserts `records` into `index_name` without generating identifiers and waits
    /// until the write is acknowledged. Returns the number of records written.
    async fn save_objects(&self, index_name: &str, records: &[Record]) -> Result<usize, SinkError>;
}

/// Checks that every record has a non-empty `objectID` and that no identifier repeats.
pub fn validate_batch(index_name: &str, records: &[Record]) -> Result<(), SinkError> {
    let mut seen = HashSet::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let id = object_id(record).ok_or_else(|| SinkError::MissingObjectId {
            index: index_name.to_string(),
            position,
        })?;

        if !seen.insert(id) {
            return Err(SinkError::DuplicateObjectId {
                index: index_name.to_string(),
                object_id: id.to_string(),
            });
        }
    }

    Ok(())
}

pub struct AlgoliaClient {
    http_client: reqwest::Client,
    base_url: String,
    app_id: String,
    api_key: String,
    batch_size: usize,
    poll_interval: Duration,
}

impl AlgoliaClient {
    pub fn new(config: &AlgoliaConfig, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, config))
    }

    pub fn with_client(http_client: reqwest::Client, config: &AlgoliaConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url(),
            app_id: config.app_id.clone(),
            api_key: config.admin_api_key.clone(),
            batch_size: config.batch_size.max(1),
            poll_interval: config.task_poll_interval,
        }
    }

    /// Builds `{base}/1/indexes/{index}/{tail...}` with every segment percent-encoded.
    fn index_url(&self, index_name: &str, tail: &[&str]) -> Result<reqwest::Url, SinkError> {
        let invalid = || SinkError::InvalidIndexName(index_name.to_string());

        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["1", "indexes", index_name])
            .extend(tail);
        Ok(url)
    }

    async fn send_batch(&self, index_name: &str, chunk: &[Record]) -> Result<u64, SinkError> {
        let url = self.index_url(index_name, &["batch"])?;

        let response = self
            .http_client
            .post(url)
            .header(HEADER_APPLICATION_ID, &self.app_id)
            .header(HEADER_API_KEY, &self.api_key)
            .json(&BatchRequest::update_objects(chunk))
            .send()
            .await?;

        let ack: BatchResponse = decode(response).await?;
        tracing::debug!(
            "Index {} accepted {} records as task {}",
            index_name,
            chunk.len(),
            ack.task_id
        );
        Ok(ack.task_id)
    }

    /// Polls the task until the search service reports it as published.
    pub async fn wait_task(&self, index_name: &str, task_id: u64) -> Result<(), SinkError> {
        let task = task_id.to_string();
        let url = self.index_url(index_name, &["task", &task])?;

        loop {
            let response = self
                .http_client
                .get(url.clone())
                .header(HEADER_APPLICATION_ID, &self.app_id)
                .header(HEADER_API_KEY, &self.api_key)
                .send()
                .await?;

            let status: TaskStatusResponse = decode(response).await?;
            if status.status == TASK_PUBLISHED {
                return Ok(());
            }

            tracing::trace!("Task {} on {} is {}", task_id, index_name, status.status);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl SearchIndex for AlgoliaClient {
    async fn save_objects(&self, index_name: &str, records: &[Record]) -> Result<usize, SinkError> {
        validate_batch(index_name, records)?;

        let mut task_ids = Vec::new();
        for chunk in records.chunks(self.batch_size) {
            task_ids.push(self.send_batch(index_name, chunk).await?);
        }

        for task_id in task_ids {
            self.wait_task(index_name, task_id).await?;
        }

        Ok(records.len())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SinkError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SinkError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
