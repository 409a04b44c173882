//! Integration tests for URL routing and routing-file persistence

use std::sync::Arc;
use urlsift_domain::ExtractorConfig;
use urlsift_router::{
    MatcherOptions, PatternType, RouterError, StrategyMapping, StrategyRouter,
    UrlExtractorMapping, UrlMappingManager,
};

/// Helper to build the coindesk routing table
fn coindesk_manager() -> UrlMappingManager {
    let mut manager = UrlMappingManager::new();
    manager.add_mapping(
        UrlExtractorMapping::new(
            "coindesk.com",
            PatternType::Domain,
            vec![ExtractorConfig::new("crypto_news", "news")],
            10,
        )
        .unwrap(),
    );
    manager.add_mapping(
        UrlExtractorMapping::new(
            "/price/",
            PatternType::Path,
            vec![ExtractorConfig::new("price_extractor", "price")],
            5,
        )
        .unwrap(),
    );
    manager
}

#[test]
fn test_coindesk_scenario() {
    let manager = coindesk_manager();

    let resolved = manager.resolve_all_extractors("https://coindesk.com/price/btc");
    let ids: Vec<&str> = resolved.iter().map(|e| e.extractor_id.as_str()).collect();
    let groups: Vec<&str> = resolved.iter().map(|e| e.target_group.as_str()).collect();

    assert_eq!(ids, vec!["crypto_news", "price_extractor"]);
    assert_eq!(groups, vec!["news", "price"]);
}

#[test]
fn test_unmatched_url_yields_nothing_and_fallback() {
    let manager = coindesk_manager();
    assert!(manager.resolve_all_extractors("https://example.org/about").is_empty());

    let mut router: StrategyRouter<str> = StrategyRouter::new(Arc::from("general"));
    router.add_mapping(
        StrategyMapping::new(
            "coindesk.com",
            PatternType::Domain,
            MatcherOptions::default(),
            Arc::from("crypto"),
            10,
        )
        .unwrap(),
    );

    assert_eq!(&*router.resolve_single_strategy("https://example.org/about"), "general");
    assert_eq!(&*router.resolve_single_strategy("https://www.coindesk.com/x"), "crypto");
}

#[test]
fn test_save_then_load_reproduces_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.json");

    let mut original = coindesk_manager();
    let mut params = serde_json::Map::new();
    params.insert("depth".to_string(), serde_json::json!(2));
    original.add_mapping(
        UrlExtractorMapping::with_options(
            r"^https://blog\.",
            PatternType::Regex,
            MatcherOptions::case_sensitive(),
            vec![ExtractorConfig {
                extractor_id: "blog".to_string(),
                target_group: "article".to_string(),
                params,
            }],
            5,
        )
        .unwrap(),
    );
    original.save_config(&path).unwrap();

    let mut restored = UrlMappingManager::new();
    let count = restored.load_config(&path).unwrap();

    assert_eq!(count, 3);
    assert_eq!(restored.mappings(), original.mappings());
    assert_eq!(
        restored.resolve_all_extractors("https://coindesk.com/price/btc"),
        original.resolve_all_extractors("https://coindesk.com/price/btc")
    );
}

#[test]
fn test_load_replaces_existing_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.json");
    std::fs::write(
        &path,
        r#"{"mappings": [{"url_pattern": "a.com", "pattern_type": "domain", "priority": 1,
            "extractors": [{"extractor_id": "a", "target_group": "g"}]}]}"#,
    )
    .unwrap();

    let mut manager = coindesk_manager();
    manager.load_config(&path).unwrap();

    assert_eq!(manager.len(), 1);
    assert!(manager.resolve_all_extractors("https://coindesk.com/price/btc").is_empty());
}

#[test]
fn test_failed_load_leaves_table_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.json");
    std::fs::write(
        &path,
        r#"{"mappings": [
            {"url_pattern": "ok.com", "pattern_type": "domain"},
            {"url_pattern": "([unclosed", "pattern_type": "regex"}
        ]}"#,
    )
    .unwrap();

    let mut manager = coindesk_manager();
    let result = manager.load_config(&path);

    assert!(matches!(result, Err(RouterError::InvalidPattern { .. })));
    assert_eq!(manager.len(), 2);
    assert_eq!(manager.resolve_all_extractors("https://coindesk.com/price/btc").len(), 2);
}

#[test]
fn test_load_missing_file() {
    let mut manager = coindesk_manager();
    let result = manager.load_config("/nonexistent/routes.json");
    assert!(matches!(result, Err(RouterError::Io(_))));
    assert_eq!(manager.len(), 2);
}
