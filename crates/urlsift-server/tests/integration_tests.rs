//! Integration tests for the HTTP surface

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::io::Write;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use urlsift_llm::MockProvider;
use urlsift_router::{MatcherOptions, PatternType};
use urlsift_server::{
    build_pipeline_with,
    config::{ServerConfig, StrategyRouteConfig},
    handlers::{create_router, AppState, ExtractAllResponse, RouteResponse},
};

const ROUTES: &str = r#"{
    "mappings": [
        {
            "url_pattern": "coindesk.com",
            "pattern_type": "domain",
            "priority": 10,
            "matcher_options": {"include_subdomains": true},
            "extractors": [{"extractor_id": "crypto", "target_group": "news"}]
        },
        {
            "url_pattern": "/markets/",
            "pattern_type": "path",
            "priority": 5,
            "extractors": [
                {"extractor_id": "general", "target_group": "price", "params": {"content_type": "general"}},
                {"extractor_id": "orderbook", "target_group": "price"}
            ]
        }
    ]
}"#;

const CRYPTO_RESPONSE: &str = r#"{
    "title": "Bitcoin tops 70k",
    "content": "Bitcoin rallied overnight.",
    "cryptocurrencies": [{"symbol": "BTC", "name": "Bitcoin"}],
    "sentiment": "bullish"
}"#;

/// Helper to create an app backed by a mock LLM and a routing file
fn create_test_app(llm: MockProvider) -> (Router, tempfile::NamedTempFile) {
    let mut routes = tempfile::NamedTempFile::new().unwrap();
    routes.write_all(ROUTES.as_bytes()).unwrap();

    let mut config = ServerConfig::default_test_config();
    config.routing_file = Some(routes.path().to_path_buf());
    config.strategy_routes.push(StrategyRouteConfig {
        pattern: "coindesk.com".to_string(),
        pattern_type: PatternType::Domain,
        strategy: "crypto".to_string(),
        priority: 10,
        matcher_options: MatcherOptions::subdomains(),
    });

    let pipeline = build_pipeline_with(&config, Arc::new(llm)).unwrap();
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    (create_router(state), routes)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_route_endpoint() {
    let (app, _routes) = create_test_app(MockProvider::default());

    let request = Request::builder()
        .method("GET")
        .uri("/route?url=https%3A%2F%2Fwww.coindesk.com%2Fmarkets%2Fbtc")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let route: RouteResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(route.url, "https://www.coindesk.com/markets/btc");
    assert_eq!(route.strategy, "crypto");
    let ids: Vec<&str> = route.extractors.iter().map(|e| e.extractor_id.as_str()).collect();
    assert_eq!(ids, vec!["crypto", "general", "orderbook"]);
}

#[tokio::test]
async fn test_route_endpoint_unmatched_uses_fallback() {
    let (app, _routes) = create_test_app(MockProvider::default());

    let request = Request::builder()
        .uri("/route?url=https%3A%2F%2Fexample.org%2F")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let route: RouteResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(route.strategy, "general");
    assert!(route.extractors.is_empty());
}

#[tokio::test]
async fn test_extract_endpoint() {
    let (app, _routes) = create_test_app(MockProvider::new(CRYPTO_RESPONSE));

    let response = app
        .oneshot(post_json(
            "/extract",
            r#"{"url": "https://coindesk.com/a", "content": "Bitcoin rallied overnight."}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(result["title"], "Bitcoin tops 70k");
    assert_eq!(result["market_impact"], "unknown");
    assert_eq!(result["_metadata"]["content_type"], "crypto");
    assert_eq!(result["_metadata"]["model"], "mock-model");
}

#[tokio::test]
async fn test_extract_llm_failure_is_bad_gateway() {
    let llm = MockProvider::default();
    llm.push_connection_error();
    let (app, _routes) = create_test_app(llm);

    let response = app
        .oneshot(post_json(
            "/extract",
            r#"{"url": "https://a.com", "content": "text"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let error: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error["error_type"], "api_connection");
}

#[tokio::test]
async fn test_extract_all_endpoint() {
    let (app, _routes) = create_test_app(MockProvider::new(CRYPTO_RESPONSE));

    let response = app
        .oneshot(post_json(
            "/extract/all",
            r#"{"url": "https://coindesk.com/markets/btc", "content": "Bitcoin rallied overnight."}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report: ExtractAllResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(report.groups["news"].len(), 1);
    assert_eq!(report.groups["price"].len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].extractor_id, "orderbook");
    assert_eq!(report.failures[0].error_type, "unknown_strategy");
}

#[tokio::test]
async fn test_metrics_endpoint_after_extraction() {
    let (app, _routes) = create_test_app(MockProvider::new(CRYPTO_RESPONSE));

    let response = app
        .clone()
        .oneshot(post_json(
            "/extract",
            r#"{"url": "https://coindesk.com/a", "content": "Bitcoin rallied overnight."}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("urlsift_extraction_attempts_total{content_type=\"crypto\"} 1"));
    assert!(text.contains("urlsift_llm_tokens_total{model=\"mock-model\",kind=\"total\"} 15"));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let (app, _routes) = create_test_app(MockProvider::default());

    let response = app
        .oneshot(post_json("/extract", r#"{"content": "no url"}"#))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
