// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! REST API server implementation using axum.
//!
//! # Endpoints
//!
//! - `POST /api/v1/search/execute` - Run a Grover search
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/engine` - Configured amplitude engine
//! - `GET /api/v1/version` - Get server version

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::ServerState;
use crate::amplitude::EngineKind;
use crate::config::{CorsConfig, ServerConfig};
use crate::error::{Error, Result, ValidationError};
use crate::search::SearchResult;
use crate::validation::validate_search_request;

/// REST server for the search service.
pub struct RestServer {
    state: Arc<ServerState>,
}

impl RestServer {
    /// Create a new REST server.
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    /// Build the router with all endpoints and middleware.
    pub fn router(&self, cors: &CorsConfig) -> Router {
        Router::new()
            .route("/api/v1/search/execute", post(execute_search))
            .route("/api/v1/health", get(health_check))
            .route("/api/v1/engine", get(get_engine_info))
            .route("/api/v1/version", get(get_version))
            .layer(cors_layer(cors))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the REST server.
    pub async fn serve(self, config: &ServerConfig) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid REST address: {}", e)))?;

        info!(address = %addr, "Starting REST server");

        let app = self.router(&config.cors);

        let mut shutdown_rx = self.state.shutdown_receiver();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Server(format!("Failed to bind REST server: {}", e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
                info!("REST server shutting down");
            })
            .await
            .map_err(|e| Error::Server(format!("REST server error: {}", e)))?;

        Ok(())
    }
}

/// Build the CORS layer from configuration.
fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allow_all {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            // A wildcard only makes sense through allow_all
            Ok(value) if value != "*" => Some(value),
            _ => {
                warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::list([Method::GET, Method::POST]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE]))
}

// =============================================================================
// Request/Response types
// =============================================================================

const MSG_INVALID_INPUT: &str = "Invalid input parameters.";
const MSG_SUCCESS: &str = "Search successful!";
const MSG_NOT_FOUND: &str = "Search failed to find the target.";

/// Search request. Missing fields bind to 0 and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchRequest {
    search_space_size: i64,
    target_index: i64,
}

/// Search response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    request_id: String,
    message: String,
    result: Option<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SearchResponse {
    fn rejected(request_id: String, message: &str, error: &Error) -> Self {
        Self {
            request_id,
            message: message.to_string(),
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
}

/// Engine info response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineInfoResponse {
    engine: EngineKind,
    max_search_space_size: usize,
}

/// Version response.
#[derive(Debug, Serialize)]
struct VersionResponse {
    version: String,
    name: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Execute search endpoint.
async fn execute_search(
    State(state): State<Arc<ServerState>>,
    payload: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> (StatusCode, Json<SearchResponse>) {
    let request_id = Uuid::new_v4().to_string();

    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let e: Error = ValidationError::Field {
                field: "body".into(),
                message: rejection.body_text(),
            }
            .into();
            warn!(request_id = %request_id, error = %e, "Malformed search request");
            return (
                StatusCode::BAD_REQUEST,
                Json(SearchResponse::rejected(request_id, MSG_INVALID_INPUT, &e)),
            );
        }
    };

    debug!(
        request_id = %request_id,
        search_space_size = req.search_space_size,
        target_index = req.target_index,
        "REST execute_search request"
    );

    if let Err(e) = validate_search_request(
        req.search_space_size,
        req.target_index,
        state.search.max_size(),
    ) {
        warn!(request_id = %request_id, error = %e, "Rejected search request");
        return (
            StatusCode::BAD_REQUEST,
            Json(SearchResponse::rejected(request_id, MSG_INVALID_INPUT, &e)),
        );
    }

    let permit = match state.search_permits.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Search permits closed");
            let e = Error::Server(format!("search capacity unavailable: {}", e));
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchResponse::rejected(request_id, "Search failed.", &e)),
            );
        }
    };

    // Engines are CPU-bound; keep them off the async workers. The permit
    // lives until the engine is dropped.
    let search = state.search;
    let outcome = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        search.execute(req.search_space_size, req.target_index)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => {
            info!(
                request_id = %request_id,
                found_index = result.found_index,
                success = result.success,
                iterations = result.iterations,
                elapsed_ms = result.execution_time_millis,
                "Search completed"
            );
            let message = if result.success {
                MSG_SUCCESS
            } else {
                MSG_NOT_FOUND
            };
            (
                StatusCode::OK,
                Json(SearchResponse {
                    request_id,
                    message: message.to_string(),
                    result: Some(result),
                    error: None,
                }),
            )
        }
        Ok(Err(e)) if e.is_client_error() => {
            warn!(request_id = %request_id, error = %e, "Search rejected by engine");
            (
                StatusCode::BAD_REQUEST,
                Json(SearchResponse::rejected(request_id, MSG_INVALID_INPUT, &e)),
            )
        }
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "Search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchResponse::rejected(request_id, "Search failed.", &e)),
            )
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Search task panicked");
            let e = Error::Server(format!("search task failed: {}", e));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchResponse::rejected(request_id, "Search failed.", &e)),
            )
        }
    }
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Engine info endpoint.
async fn get_engine_info(State(state): State<Arc<ServerState>>) -> Json<EngineInfoResponse> {
    Json(EngineInfoResponse {
        engine: state.search.engine(),
        max_search_space_size: state.search.max_size(),
    })
}

/// Get version endpoint.
async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: "QubitOS Grover".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::GroverSearch;
    use axum::extract::FromRequest;

    fn state_with(search: GroverSearch) -> State<Arc<ServerState>> {
        State(Arc::new(ServerState::new(search, 4)))
    }

    fn request(
        search_space_size: i64,
        target_index: i64,
    ) -> std::result::Result<Json<SearchRequest>, JsonRejection> {
        Ok(Json(SearchRequest {
            search_space_size,
            target_index,
        }))
    }

    async fn request_from_body(
        body: &'static str,
    ) -> std::result::Result<Json<SearchRequest>, JsonRejection> {
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/v1/search/execute")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap();
        Json::<SearchRequest>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_rest_server_creation() {
        let state = Arc::new(ServerState::new(GroverSearch::default(), 4));
        let server = RestServer::new(state);
        let _router = server.router(&CorsConfig::default());
        let _permissive = server.router(&CorsConfig {
            allow_all: true,
            allowed_origins: vec![],
        });
    }

    #[tokio::test]
    async fn test_execute_search_success() {
        for engine in EngineKind::ALL {
            let (status, Json(body)) =
                execute_search(state_with(GroverSearch::new(engine)), request(16, 5)).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body.message, MSG_SUCCESS);
            assert!(body.error.is_none());
            let result = body.result.expect("result present");
            assert_eq!(result.found_index, 5);
            assert_eq!(result.target_index, 5);
            assert_eq!(result.iterations, 3);
            assert_eq!(result.engine, engine);
            assert!(Uuid::parse_str(&body.request_id).is_ok());
        }
    }

    #[tokio::test]
    async fn test_execute_search_rejects_invalid_input() {
        for (size, target) in [(0, 0), (-3, 0), (10, 10), (10, -1)] {
            let (status, Json(body)) =
                execute_search(state_with(GroverSearch::default()), request(size, target)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "size={size} target={target}");
            assert_eq!(body.message, MSG_INVALID_INPUT);
            assert!(body.result.is_none());
            assert!(body.error.is_some());
        }
    }

    #[tokio::test]
    async fn test_execute_search_rejects_oversized_space() {
        let search = GroverSearch::with_max_size(EngineKind::SegmentTree, 64);
        let (status, Json(body)) = execute_search(state_with(search), request(65, 0)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.unwrap().contains("Resource limit"));
    }

    #[tokio::test]
    async fn test_search_response_json_shape() {
        let (_, Json(body)) =
            execute_search(state_with(GroverSearch::default()), request(4, 1)).await;
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], MSG_SUCCESS);
        assert_eq!(json["result"]["foundIndex"], 1);
        assert_eq!(json["result"]["searchSpaceSize"], 4);
        assert!(json.get("requestId").is_some());
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_execute_search_missing_fields_is_bad_request() {
        for body in [r#"{}"#, r#"{"targetIndex": 3}"#] {
            let (status, Json(body)) =
                execute_search(state_with(GroverSearch::default()), request_from_body(body).await)
                    .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.message, MSG_INVALID_INPUT);
            assert!(body.result.is_none());
            assert!(body.error.unwrap().contains("searchSpaceSize"));
        }
    }

    #[tokio::test]
    async fn test_execute_search_malformed_body_is_bad_request() {
        for body in [r#"{"searchSpaceSize": "#, r#"{"searchSpaceSize": "big"}"#] {
            let payload = request_from_body(body).await;
            assert!(payload.is_err());
            let (status, Json(body)) =
                execute_search(state_with(GroverSearch::default()), payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.message, MSG_INVALID_INPUT);
            assert!(body.result.is_none());
            assert!(body.error.is_some());
        }
    }

    #[tokio::test]
    async fn test_execute_search_waits_for_permit() {
        let state = Arc::new(ServerState::new(GroverSearch::default(), 1));
        let held = state.search_permits.clone().acquire_owned().await.unwrap();

        let pending = tokio::spawn(execute_search(State(state.clone()), request(16, 5)));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        drop(held);
        let (status, Json(body)) = tokio::time::timeout(std::time::Duration::from_secs(5), pending)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.result.unwrap().found_index, 5);
        assert_eq!(state.search_permits.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_rejected_request_does_not_take_permit() {
        let state = Arc::new(ServerState::new(GroverSearch::default(), 1));
        let _held = state.search_permits.clone().acquire_owned().await.unwrap();
        let (status, _) = execute_search(State(state.clone()), request(0, 0)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_search_request_missing_fields_default_to_zero() {
        let req: SearchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.search_space_size, 0);
        assert_eq!(req.target_index, 0);
    }

    #[test]
    fn test_search_request_deserializes_camel_case() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"searchSpaceSize": 1024, "targetIndex": 512}"#).unwrap();
        assert_eq!(req.search_space_size, 1024);
        assert_eq!(req.target_index, 512);
    }

    #[tokio::test]
    async fn test_engine_info() {
        let search = GroverSearch::with_max_size(EngineKind::Fenwick, 4096);
        let Json(info) = get_engine_info(state_with(search)).await;
        assert_eq!(info.engine, EngineKind::Fenwick);
        assert_eq!(info.max_search_space_size, 4096);
    }

    #[tokio::test]
    async fn test_health_and_version() {
        let Json(health) = health_check().await;
        assert_eq!(health.status, "healthy");

        let Json(version) = get_version().await;
        assert_eq!(version.version, env!("CARGO_PKG_VERSION"));
    }
}
