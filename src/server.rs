//! HTTP server.
//!
//! Exposes the [`api`](crate::api) operations over JSON HTTP.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/chunk` | Split `text` into chunks of at most `max_tokens` tokens |
//! | `POST` | `/tokenize` | Count tokens of `text` and preview the ids |
//! | `GET`  | `/health` | Probe the tokenizer |
//!
//! # Status Codes
//!
//! `400` for missing or invalid parameters, `500` for tokenizer failures and
//! an unhealthy probe, `200` otherwise. Error bodies are `{"error": "..."}`.
//!
//! # CORS
//!
//! One allowed origin when configured, otherwise any origin.
//!
//! # Body Size
//!
//! Documents of any size are accepted unless
//! [`ServerConfig::max_body_bytes`] is set; oversized bodies then get a `400`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{self, ApiError, ApiErrorKind, ChunkRequest, TokenizeRequest};
use crate::Tokenizer;

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: SocketAddr,
    /// The single origin allowed by CORS; `None` allows any.
    pub allow_origin: Option<String>,
    /// Request body limit in bytes; `None` accepts any size.
    pub max_body_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            allow_origin: None,
            max_body_bytes: None,
        }
    }
}

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    tokenizer: Arc<dyn Tokenizer>,
}

/// Build the router without binding a socket.
///
/// # Errors
///
/// Fails if `allow_origin` is not a valid header value.
pub fn router(tokenizer: Arc<dyn Tokenizer>, config: &ServerConfig) -> anyhow::Result<Router> {
    let cors = match &config.allow_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(HeaderValue::from_str(origin)?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let body_limit = match config.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Ok(Router::new()
        .route("/chunk", post(handle_chunk))
        .route("/tokenize", post(handle_tokenize))
        .route("/health", get(handle_health))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { tokenizer }))
}

/// Bind and serve until the process is terminated.
///
/// # Errors
///
/// Returns an error if the router cannot be built or the address cannot be bound.
pub async fn run_server(tokenizer: Arc<dyn Tokenizer>, config: &ServerConfig) -> anyhow::Result<()> {
    let app = router(tokenizer, config)?;

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, "paraslab server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ApiErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.message, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

/// A body that is not valid JSON for the endpoint is the caller's fault.
fn rejected(rejection: &JsonRejection) -> ApiError {
    ApiError {
        kind: ApiErrorKind::BadRequest,
        message: rejection.body_text(),
    }
}

// ============ Handlers ============

/// `POST /chunk`
///
/// Chunking is CPU-bound and may call the tokenizer thousands of times, so
/// it runs on the blocking pool.
async fn handle_chunk(
    State(state): State<AppState>,
    payload: Result<Json<ChunkRequest>, JsonRejection>,
) -> Result<Json<api::ChunkResponse>, ApiError> {
    let Json(request) = payload.map_err(|r| rejected(&r))?;
    let tokenizer = state.tokenizer;
    let response = tokio::task::spawn_blocking(move || api::chunk(tokenizer.as_ref(), request))
        .await
        .map_err(|e| ApiError {
            kind: ApiErrorKind::Internal,
            message: e.to_string(),
        })??;
    Ok(Json(response))
}

/// `POST /tokenize`
async fn handle_tokenize(
    State(state): State<AppState>,
    payload: Result<Json<TokenizeRequest>, JsonRejection>,
) -> Result<Json<api::TokenizeResponse>, ApiError> {
    let Json(request) = payload.map_err(|r| rejected(&r))?;
    api::tokenize(state.tokenizer.as_ref(), request).map(Json)
}

/// `GET /health`
async fn handle_health(State(state): State<AppState>) -> Response {
    let health = api::health(state.tokenizer.as_ref());
    let status = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(health)).into_response()
}
