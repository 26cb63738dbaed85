//! Search Index Wire Types
//!
//! Request and response bodies of the Algolia indexing API.

use crate::records::types::Record;

use serde::{Deserialize, Serialize};

/// Batch action that upserts by `objectID` and never generates one.
pub const ACTION_UPDATE_OBJECT: &str = "updateObject";
/// Task status reported once a write is visible in the index.
pub const TASK_PUBLISHED: &str = "published";

/// Body of `POST /1/indexes/{index}/batch`.
#[derive(Debug, Serialize)]
pub struct BatchRequest<'a> {
    pub requests: Vec<BatchOperation<'a>>,
}

impl<'a> BatchRequest<'a> {
    /// Builds an upsert batch for records that already carry an `objectID`.
    pub fn update_objects(records: &'a [Record]) -> Self {
        Self {
            requests: records
                .iter()
                .map(|body| BatchOperation {
                    action: ACTION_UPDATE_OBJECT,
                    body,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchOperation<'a> {
    pub action: &'static str,
    pub body: &'a Record,
}

/// Acknowledgment of an accepted batch. The write is applied asynchronously under `task_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    #[serde(rename = "taskID")]
    pub task_id: u64,
}

/// Body of `GET /1/indexes/{index}/task/{taskID}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub status: String,
}
