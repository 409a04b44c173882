//! HTTP request handlers for the extraction service.
//!
//! Implements health, metrics scrape, route lookup and extraction
//! endpoints using axum.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;
use urlsift_domain::{ExtractorConfig, ValidationError};
use urlsift_extractor::{ExtractionPipeline, ExtractorError};

/// Prometheus text exposition format
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Routing, strategies, validation and metrics
    pub pipeline: Arc<ExtractionPipeline>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Registered strategies
    pub strategies: usize,
    /// Extractor routing rules
    pub routes: usize,
}

/// Query of `GET /route`
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// URL to resolve
    pub url: String,
}

/// Routing decision for a URL
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    /// The URL
    pub url: String,
    /// Strategy `/extract` would run
    pub strategy: String,
    /// Extractors `/extract/all` would run
    pub extractors: Vec<ExtractorConfig>,
}

/// Body of `POST /extract` and `POST /extract/all`
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Page URL
    pub url: String,
    /// Page content (markdown or text)
    pub content: String,
    /// Schema to validate against; ignored by `/extract/all`
    #[serde(default)]
    pub content_type: Option<String>,
}

/// One failed extractor of an `/extract/all` call
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractorFailure {
    /// Extractor identifier
    pub extractor_id: String,
    /// Target group it would have populated
    pub target_group: String,
    /// Metrics label of the error
    pub error_type: String,
    /// Error message
    pub error: String,
}

/// Response of `POST /extract/all`
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractAllResponse {
    /// The URL
    pub url: String,
    /// Successful results by target group
    pub groups: BTreeMap<String, Vec<Value>>,
    /// Failed extractors
    pub failures: Vec<ExtractorFailure>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error kind
    pub error_type: String,
    /// Critical validation errors, for schema failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<ValidationError>>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed request
    BadRequest(String),
    /// Extraction failure
    Extraction(ExtractorError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(e) => match e {
                ExtractorError::SchemaValidation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ExtractorError::UnknownStrategy(_) => StatusCode::NOT_FOUND,
                ExtractorError::ApiConnection(_)
                | ExtractorError::ApiResponse { .. }
                | ExtractorError::ContentParse(_)
                | ExtractorError::Fetch(_) => StatusCode::BAD_GATEWAY,
                ExtractorError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(message) => ErrorResponse {
                error: message,
                error_type: "bad_request".to_string(),
                validation_errors: None,
            },
            AppError::Extraction(e) => {
                let validation_errors = match &e {
                    ExtractorError::SchemaValidation { errors } => Some(errors.clone()),
                    _ => None,
                };
                ErrorResponse {
                    error: e.to_string(),
                    error_type: e.error_type().to_string(),
                    validation_errors,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExtractorError> for AppError {
    fn from(e: ExtractorError) -> Self {
        AppError::Extraction(e)
    }
}

fn require_url(url: &str) -> Result<(), AppError> {
    if url.trim().is_empty() {
        return Err(AppError::BadRequest("url cannot be empty".to_string()));
    }
    Ok(())
}

/// GET /health - Service health
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        strategies: state.pipeline.strategies().len(),
        routes: state.pipeline.routes().len(),
    })
}

/// GET /metrics - Prometheus scrape
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.pipeline.metrics().render_prometheus(),
    )
}

/// GET /route?url= - Routing decision without extraction
async fn route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    require_url(&query.url)?;

    let strategy = state.pipeline.resolve_single_strategy(&query.url);
    Ok(Json(RouteResponse {
        strategy: strategy.name().to_string(),
        extractors: state.pipeline.resolve_all_extractors(&query.url),
        url: query.url,
    }))
}

/// POST /extract - Run the single strategy chosen for the URL
async fn extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<Value>, AppError> {
    require_url(&request.url)?;

    let result = state
        .pipeline
        .extract(&request.url, &request.content, request.content_type.as_deref())
        .await?;
    Ok(Json(result.into_value()))
}

/// POST /extract/all - Run every extractor routed for the URL
async fn extract_all(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractAllResponse>, AppError> {
    require_url(&request.url)?;

    let report = state.pipeline.extract_all(&request.url, &request.content).await;

    let mut groups: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    let mut failures = Vec::new();
    for outcome in report.outcomes {
        match outcome.result {
            Ok(result) => groups
                .entry(outcome.extractor.target_group)
                .or_default()
                .push(result.into_value()),
            Err(e) => {
                warn!("Extractor '{}' failed: {}", outcome.extractor.extractor_id, e);
                failures.push(ExtractorFailure {
                    extractor_id: outcome.extractor.extractor_id,
                    target_group: outcome.extractor.target_group,
                    error_type: e.error_type().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(Json(ExtractAllResponse {
        url: report.url,
        groups,
        failures,
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/route", get(route))
        .route("/extract", post(extract))
        .route("/extract/all", post(extract_all))
        .with_state(state)
}
