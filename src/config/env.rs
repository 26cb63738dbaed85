//! Environment Loading
//!
//! Builds a `SyncConfig` from environment variables. The lookup function is injectable
//! so tests never have to mutate the process environment.

use super::types::*;
use crate::error::ConfigError;

use std::str::FromStr;
use std::time::Duration;

pub const ENV_ALGOLIA_APP_ID: &str = "ALGOLIA_APP_ID";
pub const ENV_ALGOLIA_API_ADMIN_TOKEN: &str = "ALGOLIA_API_ADMIN_TOKEN";
pub const ENV_ALGOLIA_INDEX_NAME: &str = "ALGOLIA_INDEX_NAME";
pub const ENV_ALGOLIA_BASE_URL: &str = "ALGOLIA_BASE_URL";
pub const ENV_ALGOLIA_BATCH_SIZE: &str = "ALGOLIA_BATCH_SIZE";
pub const ENV_STORYBLOK_TOKEN: &str = "STORYBLOK_CONTENT_DELIVERY_API_TOKEN";
pub const ENV_STORYBLOK_BASE_URL: &str = "STORYBLOK_BASE_URL";
pub const ENV_STORYBLOK_STARTS_WITH: &str = "STORYBLOK_STARTS_WITH";
pub const ENV_STORYBLOK_PER_PAGE: &str = "STORYBLOK_PER_PAGE";
pub const ENV_STORYBLOK_PAGE: &str = "STORYBLOK_PAGE";
pub const ENV_STORYBLOK_VERSION: &str = "STORYBLOK_VERSION";
pub const ENV_SYNC_DISCRIMINATOR: &str = "SYNC_DISCRIMINATOR";
pub const ENV_SYNC_FETCH_POLICY: &str = "SYNC_FETCH_POLICY";
pub const ENV_SYNC_INDEX_NAME_POLICY: &str = "SYNC_INDEX_NAME_POLICY";
pub const ENV_SYNC_NORMALIZE_NUMBERS: &str = "SYNC_NORMALIZE_NUMBERS";
pub const ENV_SYNC_REQUEST_TIMEOUT_MS: &str = "SYNC_REQUEST_TIMEOUT_MS";

impl SyncConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let mut algolia = AlgoliaConfig::new(
            require(ENV_ALGOLIA_APP_ID)?,
            require(ENV_ALGOLIA_API_ADMIN_TOKEN)?,
        );
        algolia.base_url = get(ENV_ALGOLIA_BASE_URL);
        let batch_size = parse_opt::<usize>(ENV_ALGOLIA_BATCH_SIZE, get(ENV_ALGOLIA_BATCH_SIZE))?;
        if let Some(batch_size) = batch_size {
            algolia.batch_size = batch_size;
        }

        let mut storyblok = StoryblokConfig::new(require(ENV_STORYBLOK_TOKEN)?);
        storyblok.base_url = get(ENV_STORYBLOK_BASE_URL);

        // An explicit discriminator always wins over a single index name.
        let mode = match (get(ENV_SYNC_DISCRIMINATOR), get(ENV_ALGOLIA_INDEX_NAME)) {
            (Some(field), _) => SyncMode::ByDiscriminator { field },
            (None, Some(index_name)) => SyncMode::SingleIndex { index_name },
            (None, None) => SyncMode::default(),
        };

        let mut config = SyncConfig::new(algolia, storyblok, mode);

        if let Some(starts_with) = lookup(ENV_STORYBLOK_STARTS_WITH) {
            config.query.starts_with = starts_with;
        }
        if let Some(per_page) = parse_opt(ENV_STORYBLOK_PER_PAGE, get(ENV_STORYBLOK_PER_PAGE))? {
            config.query.per_page = per_page;
        }
        if let Some(page) = parse_opt(ENV_STORYBLOK_PAGE, get(ENV_STORYBLOK_PAGE))? {
            config.query.page = page;
        }
        if let Some(version) = get(ENV_STORYBLOK_VERSION) {
            config.query.version = parse_version(&version)?;
        }
        if let Some(policy) = get(ENV_SYNC_FETCH_POLICY) {
            config.fetch_policy = parse_fetch_policy(&policy)?;
        }
        if let Some(policy) = get(ENV_SYNC_INDEX_NAME_POLICY) {
            config.index_name_policy = parse_index_name_policy(&policy)?;
        }
        if let Some(flag) = get(ENV_SYNC_NORMALIZE_NUMBERS) {
            config.normalize_numbers = parse_bool(ENV_SYNC_NORMALIZE_NUMBERS, &flag)?;
        }
        let timeout_ms =
            parse_opt::<u64>(ENV_SYNC_REQUEST_TIMEOUT_MS, get(ENV_SYNC_REQUEST_TIMEOUT_MS))?;
        if let Some(ms) = timeout_ms {
            config.request_timeout = Some(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_opt<T: FromStr>(
    key: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(None),
    }
}

fn parse_version(raw: &str) -> Result<ContentVersion, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "draft" => Ok(ContentVersion::Draft),
        "published" => Ok(ContentVersion::Published),
        _ => Err(ConfigError::Invalid {
            key: ENV_STORYBLOK_VERSION,
            value: raw.to_string(),
        }),
    }
}

fn parse_fetch_policy(raw: &str) -> Result<FetchPolicy, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "all_or_nothing" | "all-or-nothing" => Ok(FetchPolicy::AllOrNothing),
        "partial" | "partial_collection" | "partial-collection" => {
            Ok(FetchPolicy::PartialCollection)
        }
        _ => Err(ConfigError::Invalid {
            key: ENV_SYNC_FETCH_POLICY,
            value: raw.to_string(),
        }),
    }
}

fn parse_index_name_policy(raw: &str) -> Result<IndexNamePolicy, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "verbatim" => Ok(IndexNamePolicy::Verbatim),
        "reject" => Ok(IndexNamePolicy::Reject),
        "sanitize" => Ok(IndexNamePolicy::Sanitize),
        _ => Err(ConfigError::Invalid {
            key: ENV_SYNC_INDEX_NAME_POLICY,
            value: raw.to_string(),
        }),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}
