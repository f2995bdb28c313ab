//! HTTP API for the recall engine.
//!
//! Exposes recall and manual capture over a small JSON API for the web
//! client and other service-layer callers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/recall` | Match the user's archive against the current context |
//! | `POST` | `/api/capture` | Archive a manual snippet and invalidate the recall cache |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one schema:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "tags must be an array" } }
//! ```
//!
//! Error codes: `bad_request` (400), `upstream_error` (502), `internal` (500).
//! Request-shape problems are rejected before any scoring happens; archive
//! store failures propagate unmodified as `upstream_error` — retry policy
//! belongs to the caller.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::capture::{capture_item, CaptureRequest};
use crate::config::Config;
use crate::engine::RecallEngine;
use crate::models::ContextQuery;
use crate::store::{ArchiveStore, JsonArchiveStore};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<RecallEngine>,
    archive: Arc<JsonArchiveStore>,
}

/// Starts the HTTP server on the address configured in `[server].bind`.
///
/// Builds the archive store and recall engine from the config and runs
/// until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let archive = Arc::new(JsonArchiveStore::new(config.archive.path.clone()));
    let store: Arc<dyn ArchiveStore> = archive.clone();
    let engine = Arc::new(RecallEngine::new(
        store,
        &config.cache,
        config.recall.clone(),
    ));

    let state = AppState { engine, archive };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/recall", post(handle_recall))
        .route("/api/capture", post(handle_capture))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("Memoria API listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 502 error for archive store failures.
fn upstream_error(err: anyhow::Error) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        code: "upstream_error".to_string(),
        message: err.to_string(),
    }
}

/// Constructs a 500 error for unexpected failures.
fn internal_error(err: anyhow::Error) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: err.to_string(),
    }
}

// ============ Request parsing ============

/// The user a request acts for; anonymous when the field is absent.
fn request_user_id(body: &Value) -> &str {
    body.get("userId")
        .and_then(Value::as_str)
        .unwrap_or("anonymous")
}

/// A field that must be an array of strings when present; absent or null
/// reads as empty.
fn optional_string_array(body: &Value, field: &str) -> Result<Vec<String>, AppError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    bad_request(format!("{} must be an array of strings", field))
                })
            })
            .collect(),
        Some(_) => Err(bad_request(format!("{} must be an array", field))),
    }
}

/// A field that must be a string when present.
fn optional_string(body: &Value, field: &str) -> Result<Option<String>, AppError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(bad_request(format!("{} must be a string", field))),
    }
}

fn parse_recall_request(body: &Value) -> Result<ContextQuery, AppError> {
    Ok(ContextQuery {
        context_tags: optional_string_array(body, "tags")?,
        description: optional_string(body, "description")?,
        query: optional_string(body, "query")?,
    })
}

// ============ POST /api/recall ============

/// Handler for `POST /api/recall`.
///
/// Validates the request shape, runs the recall engine, and wraps the
/// result in the `{ success, data, message }` envelope.
async fn handle_recall(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let context = parse_recall_request(&body)?;
    let user_id = request_user_id(&body);

    let result = state
        .engine
        .recall(user_id, &context)
        .await
        .map_err(upstream_error)?;

    tracing::info!(
        user = user_id,
        match_count = result.matches.len(),
        has_matches = !result.matches.is_empty(),
        "recall request processed"
    );

    let message = format!("Found {} relevant items", result.matches.len());
    Ok(Json(json!({
        "success": true,
        "data": result,
        "message": message,
    })))
}

// ============ POST /api/capture ============

/// Handler for `POST /api/capture`.
///
/// Archives a manual snippet for the user and invalidates their recall
/// cache entry so the next recall sees the new item.
async fn handle_capture(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let input = match body.get("input") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) => return Err(bad_request("input must not be empty")),
        Some(_) => return Err(bad_request("input must be a string")),
        None => return Err(bad_request("input is required")),
    };
    let title = optional_string(&body, "title")?;
    let tags = optional_string_array(&body, "tags")?;
    let user_id = request_user_id(&body);

    let request = CaptureRequest { input, title, tags };
    let item = capture_item(&state.archive, &state.engine, user_id, &request)
        .map_err(internal_error)?;

    Ok(Json(json!({
        "success": true,
        "data": item,
        "message": "Item captured",
    })))
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
