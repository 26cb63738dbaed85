//! Content Source Types
//!
//! Request descriptors and the decoded shape of a paginated stories listing.

use crate::config::types::QueryOptions;
use crate::error::SourceError;

use serde::{Deserialize, Serialize};

/// One page request. Built once per page from the shared query options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    options: QueryOptions,
}

impl FetchRequest {
    pub fn new(options: &QueryOptions, page: u32) -> Self {
        Self {
            options: options.with_page(page),
        }
    }

    pub fn page(&self) -> u32 {
        self.options.page
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }
}

/// A single content entry as returned by the listing endpoint.
///
/// Only the fields the indexer needs are decoded; everything else in the story
/// envelope (slug, timestamps, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

/// Body of `GET /cdn/stories`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoriesBody {
    #[serde(default)]
    pub stories: Vec<Story>,
}

/// One decoded page together with the metadata read from its headers.
#[derive(Debug, Clone, PartialEq)]
pub struct StoriesPage {
    pub page: u32,
    /// Value of the `total` response header, if present.
    pub total: Option<u64>,
    pub stories: Vec<Story>,
}

/// Result of the page-count probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProbe {
    pub total: u64,
    pub page_count: u32,
}

/// A page that could not be fetched under the partial-collection policy.
#[derive(Debug)]
pub struct PageFailure {
    pub page: u32,
    pub error: SourceError,
}

/// Pages gathered by the concurrent fetch, in request order.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub pages: Vec<StoriesPage>,
    pub failed: Vec<PageFailure>,
}
