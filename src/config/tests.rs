//! Configuration Tests
//!
//! Covers defaults, validation and environment loading through an injected lookup.

#[cfg(test)]
mod tests {
    use crate::config::types::*;
    use crate::error::ConfigError;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("ALGOLIA_APP_ID", "APP123"),
            ("ALGOLIA_API_ADMIN_TOKEN", "admin-key"),
            ("STORYBLOK_CONTENT_DELIVERY_API_TOKEN", "sb-token"),
        ]
    }

    fn sample_config() -> SyncConfig {
        SyncConfig::new(
            AlgoliaConfig::new("APP123", "admin-key"),
            StoryblokConfig::new("sb-token"),
            SyncMode::default(),
        )
    }

    // ============================================================
    // DEFAULTS
    // ============================================================

    #[test]
    fn test_query_options_defaults() {
        let options = QueryOptions::default();

        assert_eq!(options.starts_with, "");
        assert_eq!(options.per_page, 100);
        assert_eq!(options.page, 1);
        assert_eq!(options.version, ContentVersion::Draft);
    }

    #[test]
    fn test_with_page_overrides_only_page() {
        let options = QueryOptions {
            starts_with: "blog/".to_string(),
            per_page: 25,
            page: 1,
            version: ContentVersion::Published,
        };

        let paged = options.with_page(7);

        assert_eq!(paged.page, 7);
        assert_eq!(paged.starts_with, "blog/");
        assert_eq!(paged.per_page, 25);
        assert_eq!(paged.version, ContentVersion::Published);
        // Original is untouched
        assert_eq!(options.page, 1);
    }

    #[test]
    fn test_sync_config_defaults() {
        let config = sample_config();

        assert_eq!(config.fetch_policy, FetchPolicy::AllOrNothing);
        assert_eq!(config.index_name_policy, IndexNamePolicy::Verbatim);
        assert!(!config.normalize_numbers);
        assert!(config.request_timeout.is_none());
        assert_eq!(config.discriminator(), Some("component"));
        assert_eq!(config.algolia.batch_size, 1000);
    }

    #[test]
    fn test_base_urls() {
        let mut algolia = AlgoliaConfig::new("APP123", "key");
        assert_eq!(algolia.base_url(), "https://APP123.algolia.net");

        algolia.base_url = Some("http://127.0.0.1:9000/".to_string());
        assert_eq!(algolia.base_url(), "http://127.0.0.1:9000");

        let storyblok = StoryblokConfig::new("token");
        assert_eq!(storyblok.base_url(), "https://api.storyblok.com/v1");
    }

    #[test]
    fn test_content_version_serialization() {
        assert_eq!(ContentVersion::Draft.as_str(), "draft");
        assert_eq!(
            serde_json::to_string(&ContentVersion::Published).unwrap(),
            "\"published\""
        );
        let policy: FetchPolicy = serde_json::from_str("\"partial_collection\"").unwrap();
        assert_eq!(policy, FetchPolicy::PartialCollection);
    }

    // ============================================================
    // VALIDATION
    // ============================================================

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = sample_config();
        config.query.per_page = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "STORYBLOK_PER_PAGE",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let mut config = sample_config();
        config.algolia.admin_api_key = "  ".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("ALGOLIA_API_ADMIN_TOKEN"))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_single_index_name() {
        let mut config = sample_config();
        config.mode = SyncMode::SingleIndex {
            index_name: String::new(),
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("ALGOLIA_INDEX_NAME"))
        ));
    }

    // ============================================================
    // ENVIRONMENT LOADING
    // ============================================================

    #[test]
    fn test_from_lookup_minimal() {
        let config = SyncConfig::from_lookup(lookup_from(&required())).unwrap();

        assert_eq!(config.algolia.app_id, "APP123");
        assert_eq!(config.storyblok.access_token, "sb-token");
        assert_eq!(config.query, QueryOptions::default());
        assert_eq!(config.mode, SyncMode::default());
    }

    #[test]
    fn test_from_lookup_missing_required() {
        let err = SyncConfig::from_lookup(lookup_from(&[("ALGOLIA_APP_ID", "APP123")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Missing("ALGOLIA_API_ADMIN_TOKEN")));
    }

    #[test]
    fn test_from_lookup_single_index_mode() {
        let mut pairs = required();
        pairs.push(("ALGOLIA_INDEX_NAME", "stories"));

        let config = SyncConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(
            config.mode,
            SyncMode::SingleIndex {
                index_name: "stories".to_string()
            }
        );
        assert_eq!(config.discriminator(), None);
    }

    #[test]
    fn test_from_lookup_discriminator_wins_over_index_name() {
        let mut pairs = required();
        pairs.push(("ALGOLIA_INDEX_NAME", "stories"));
        pairs.push(("SYNC_DISCRIMINATOR", "type"));

        let config = SyncConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(
            config.mode,
            SyncMode::ByDiscriminator {
                field: "type".to_string()
            }
        );
    }

    #[test]
    fn test_from_lookup_all_options() {
        let mut pairs = required();
        pairs.extend([
            ("STORYBLOK_STARTS_WITH", "docs/"),
            ("STORYBLOK_PER_PAGE", "25"),
            ("STORYBLOK_PAGE", "2"),
            ("STORYBLOK_VERSION", "published"),
            ("SYNC_FETCH_POLICY", "partial"),
            ("SYNC_INDEX_NAME_POLICY", "sanitize"),
            ("SYNC_NORMALIZE_NUMBERS", "true"),
            ("SYNC_REQUEST_TIMEOUT_MS", "1500"),
            ("ALGOLIA_BATCH_SIZE", "50"),
        ]);

        let config = SyncConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.query.starts_with, "docs/");
        assert_eq!(config.query.per_page, 25);
        assert_eq!(config.query.page, 2);
        assert_eq!(config.query.version, ContentVersion::Published);
        assert_eq!(config.fetch_policy, FetchPolicy::PartialCollection);
        assert_eq!(config.index_name_policy, IndexNamePolicy::Sanitize);
        assert!(config.normalize_numbers);
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.algolia.batch_size, 50);
    }

    #[test]
    fn test_from_lookup_invalid_values() {
        let mut pairs = required();
        pairs.push(("STORYBLOK_PER_PAGE", "many"));
        let err = SyncConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "STORYBLOK_PER_PAGE",
                ..
            }
        ));

        let mut pairs = required();
        pairs.push(("STORYBLOK_VERSION", "latest"));
        assert!(SyncConfig::from_lookup(lookup_from(&pairs)).is_err());

        let mut pairs = required();
        pairs.push(("STORYBLOK_PER_PAGE", "0"));
        assert!(SyncConfig::from_lookup(lookup_from(&pairs)).is_err());
    }
}
