//! Configuration Types
//!
//! Plain data structures describing one sync run. Everything here is built once by the
//! host process (or by `from_env`) and never mutated while a run is in flight.

use crate::error::ConfigError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_DISCRIMINATOR: &str = "component";
pub const DEFAULT_STORYBLOK_BASE_URL: &str = "https://api.storyblok.com/v1";
pub const DEFAULT_TASK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Which version of the content the source should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentVersion {
    #[default]
    Draft,
    Published,
}

impl ContentVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentVersion::Draft => "draft",
            ContentVersion::Published => "published",
        }
    }
}

/// Query parameters shared by the probe and every page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Slug prefix limiting the search scope. Empty means all content.
    pub starts_with: String,
    pub per_page: u32,
    /// Page used by the count probe. Page fetches always cover `1..=page_count`.
    pub page: u32,
    pub version: ContentVersion,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            starts_with: String::new(),
            per_page: DEFAULT_PER_PAGE,
            page: 1,
            version: ContentVersion::Draft,
        }
    }
}

impl QueryOptions {
    /// Returns a copy of these options with only the page number replaced.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// How the concurrent page fetch reacts to individual page failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPolicy {
    /// Any failed page aborts the run. Nothing is written.
    #[default]
    AllOrNothing,
    /// Successful pages are kept and written, failed pages are reported.
    PartialCollection,
}

/// What to do with a partition key that is not a safe index name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexNamePolicy {
    /// Use the key as-is.
    #[default]
    Verbatim,
    /// Fail the partition if the key has characters outside `[A-Za-z0-9_.-]`.
    Reject,
    /// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
    Sanitize,
}

/// Where records are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Every record goes to one named index.
    SingleIndex { index_name: String },
    /// Records are grouped by a discriminator field and each group goes to its own index.
    ByDiscriminator { field: String },
}

impl Default for SyncMode {
    fn default() -> Self {
        SyncMode::ByDiscriminator {
            field: DEFAULT_DISCRIMINATOR.to_string(),
        }
    }
}

/// Credentials and tuning for the search service.
#[derive(Debug, Clone)]
pub struct AlgoliaConfig {
    pub app_id: String,
    pub admin_api_key: String,
    /// Overrides `https://{app_id}.algolia.net`.
    pub base_url: Option<String>,
    /// Records per batch request. Larger partitions are split into several requests.
    pub batch_size: usize,
    pub task_poll_interval: Duration,
}

impl AlgoliaConfig {
    pub fn new(app_id: impl Into<String>, admin_api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            admin_api_key: admin_api_key.into(),
            base_url: None,
            batch_size: DEFAULT_BATCH_SIZE,
            task_poll_interval: DEFAULT_TASK_POLL_INTERVAL,
        }
    }

    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.algolia.net", self.app_id),
        }
    }
}

/// Credentials for the content source.
#[derive(Debug, Clone)]
pub struct StoryblokConfig {
    pub access_token: String,
    /// Overrides `https://api.storyblok.com/v1`.
    pub base_url: Option<String>,
}

impl StoryblokConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: None,
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_STORYBLOK_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Full configuration of one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub algolia: AlgoliaConfig,
    pub storyblok: StoryblokConfig,
    pub query: QueryOptions,
    pub mode: SyncMode,
    pub fetch_policy: FetchPolicy,
    pub index_name_policy: IndexNamePolicy,
    /// Explicit partition key -> index name table. Consulted before `index_name_policy`.
    pub index_name_map: BTreeMap<String, String>,
    pub normalize_numbers: bool,
    /// Passed to the HTTP client. `None` keeps the client's own behavior.
    pub request_timeout: Option<Duration>,
}

impl SyncConfig {
    pub fn new(algolia: AlgoliaConfig, storyblok: StoryblokConfig, mode: SyncMode) -> Self {
        Self {
            algolia,
            storyblok,
            query: QueryOptions::default(),
            mode,
            fetch_policy: FetchPolicy::default(),
            index_name_policy: IndexNamePolicy::default(),
            index_name_map: BTreeMap::new(),
            normalize_numbers: false,
            request_timeout: None,
        }
    }

    /// The field whose value is left untouched by numeric normalization besides `objectID`.
    pub fn discriminator(&self) -> Option<&str> {
        match &self.mode {
            SyncMode::ByDiscriminator { field } => Some(field),
            SyncMode::SingleIndex { .. } => None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.algolia.app_id.trim().is_empty() {
            return Err(ConfigError::Missing("ALGOLIA_APP_ID"));
        }
        if self.algolia.admin_api_key.trim().is_empty() {
            return Err(ConfigError::Missing("ALGOLIA_API_ADMIN_TOKEN"));
        }
        if self.storyblok.access_token.trim().is_empty() {
            return Err(ConfigError::Missing("STORYBLOK_CONTENT_DELIVERY_API_TOKEN"));
        }
        if self.query.per_page == 0 {
            return Err(ConfigError::Invalid {
                key: "STORYBLOK_PER_PAGE",
                value: self.query.per_page.to_string(),
            });
        }
        if self.query.page == 0 {
            return Err(ConfigError::Invalid {
                key: "STORYBLOK_PAGE",
                value: self.query.page.to_string(),
            });
        }
        if self.algolia.batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "ALGOLIA_BATCH_SIZE",
                value: self.algolia.batch_size.to_string(),
            });
        }
        match &self.mode {
            SyncMode::SingleIndex { index_name } if index_name.trim().is_empty() => {
                Err(ConfigError::Missing("ALGOLIA_INDEX_NAME"))
            }
            SyncMode::ByDiscriminator { field } if field.trim().is_empty() => {
                Err(ConfigError::Invalid {
                    key: "SYNC_DISCRIMINATOR",
                    value: field.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}
