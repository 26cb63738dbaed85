//! Content Source Client
//!
//! The `ContentSource` seam and its HTTP implementation against the Storyblok
//! Content Delivery API.

use super::types::{FetchRequest, StoriesBody, StoriesPage};
use crate::config::types::StoryblokConfig;
use crate::error::SourceError;

use async_trait::async_trait;
use std::time::Duration;

/// Endpoint listing stories, relative to the API base URL.
pub const ENDPOINT_STORIES: &str = "/cdn/stories";
/// Response header carrying the total number of stories matching the query.
pub const HEADER_TOTAL: &str = "total";

/// Paginated read access to content entries.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Reads one page of entries described by `request`.
    async fn fetch_page(&self, request: &FetchRequest) -> Result<StoriesPage, SourceError>;
}

pub struct StoryblokClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl StoryblokClient {
    pub fn new(
        config: &StoryblokConfig,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, config))
    }

    pub fn with_client(http_client: reqwest::Client, config: &StoryblokConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url(),
            access_token: config.access_token.clone(),
        }
    }
}

#[async_trait]
impl ContentSource for StoryblokClient {
    async fn fetch_page(&self, request: &FetchRequest) -> Result<StoriesPage, SourceError> {
        let options = request.options();
        let per_page = options.per_page.to_string();
        let page = options.page.to_string();

        tracing::debug!(
            "Fetching stories page {} (per_page={}, starts_with={:?})",
            page,
            per_page,
            options.starts_with
        );

        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, ENDPOINT_STORIES))
            .query(&[
                ("token", self.access_token.as_str()),
                ("starts_with", options.starts_with.as_str()),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
                ("version", options.version.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let total = match response.headers().get(HEADER_TOTAL) {
            Some(value) => {
                let raw = String::from_utf8_lossy(value.as_bytes()).to_string();
                Some(parse_total(&raw)?)
            }
            None => None,
        };

        let bytes = response.bytes().await?;
        let body: StoriesBody = serde_json::from_slice(&bytes)?;

        Ok(StoriesPage {
            page: request.page(),
            total,
            stories: body.stories,
        })
    }
}

/// Parses the `total` header. Must be a non-negative integer.
pub fn parse_total(raw: &str) -> Result<u64, SourceError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| SourceError::InvalidTotal(raw.to_string()))
}
