//! HTTP surface for the explorer
//!
//! JSON endpoints over [`Explorer`], with anything unmatched served from the
//! static client directory. This is the only layer that logs errors; it also
//! decides which status each [`ExplorerError`] kind maps to.

use axum::{
    extract::{Path, Query, Request, State},
    http::{self, header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;

use crate::client::{LedgerClient, LedgerQuery};
use crate::config::Config;
use crate::error::ExplorerError;
use crate::hosts::HostDisplayInfo;
use crate::resolver::{BlockView, Explorer, OutputView, Overview, ResolvedView};
use crate::types::{parse_lookup_hash, ExplorerStatus, Hash};

/// Shared handler state. Cloning is cheap; the explorer is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    explorer: Arc<Explorer<LedgerClient>>,
    overview_blocks: u64,
}

impl AppState {
    pub fn new(client: LedgerClient, overview_blocks: u64) -> Self {
        Self {
            explorer: Arc::new(Explorer::new(client)),
            overview_blocks,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ExplorerError> {
        let client = LedgerClient::new(&config.daemon)?;
        Ok(Self::new(client, config.server.overview_blocks))
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub struct ApiError(ExplorerError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ExplorerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ExplorerError::NotFound(_) | ExplorerError::OutputNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ExplorerError::Transport(_) | ExplorerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ExplorerError::MalformedResponse(_)
            | ExplorerError::Decode(_)
            | ExplorerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExplorerError> for ApiError {
    fn from(err: ExplorerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), error = %message, "api.error");
        } else {
            tracing::warn!(status = %status.as_u16(), error = %message, "api.error");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Utility Functions
// ============================================================================

fn parse_hash(input: &str) -> Result<Hash, ApiError> {
    Ok(parse_lookup_hash(input)?)
}

fn parse_height(input: &str) -> Result<u64, ApiError> {
    input.trim().parse::<u64>().map_err(|e| {
        ApiError(ExplorerError::InvalidInput(format!(
            "invalid height {:?}: {}",
            input, e
        )))
    })
}

fn not_found(hash: &Hash) -> ApiError {
    ApiError(ExplorerError::NotFound(format!("hash {} not found", hash)))
}

// ============================================================================
// Middleware
// ============================================================================

/// Logs method, path, status and duration for every request.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the router with all endpoints, falling back to `static_dir`.
pub fn build_api_router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![http::Method::GET, http::Method::OPTIONS])
        .allow_headers(vec![http::header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/hash/:hash", get(get_hash))
        .route("/block/hash/:hash", get(get_block_by_hash))
        .route("/block/height/:height", get(get_block_by_height))
        .route("/output/:id", get(get_output))
        .route("/transaction/:id/inputs", get(get_transaction_inputs))
        .route("/hosts", get(get_hosts))
        .route("/status", get(get_status))
        .route("/overview", get(get_overview))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .route("/height", get(redirect_height))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
}

/// Binds `server.port` on all interfaces and serves until the process exits.
pub async fn run_api_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_config(&config)?;
    let app = build_api_router(state, &config.server.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        daemon = %config.daemon.url,
        static_dir = %config.server.static_dir,
        "explorer listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn get_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<ResolvedView> {
    let hash = parse_hash(&hash)?;
    match state.explorer.resolve_hash(&hash).await? {
        ResolvedView::NotFound => Err(not_found(&hash)),
        view => Ok(Json(view)),
    }
}

async fn get_block_by_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<BlockView> {
    let hash = parse_hash(&hash)?;
    match state.explorer.resolve_hash(&hash).await? {
        ResolvedView::Block(view) => Ok(Json(view)),
        ResolvedView::NotFound => Err(not_found(&hash)),
        _ => Err(ApiError(ExplorerError::NotFound(format!(
            "{} is not a block",
            hash
        )))),
    }
}

async fn get_block_by_height(
    State(state): State<AppState>,
    Path(height): Path<String>,
) -> ApiResult<BlockView> {
    let height = parse_height(&height)?;
    Ok(Json(state.explorer.resolve_height(height).await?))
}

async fn get_output(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OutputView> {
    let id = parse_hash(&id)?;
    Ok(Json(state.explorer.find_output(&id).await?))
}

async fn get_transaction_inputs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<OutputView>> {
    let id = parse_hash(&id)?;
    match state.explorer.resolve_hash(&id).await? {
        ResolvedView::Transaction(view) => Ok(Json(state.explorer.trace_inputs(&view).await?)),
        ResolvedView::NotFound => Err(not_found(&id)),
        _ => Err(ApiError(ExplorerError::NotFound(format!(
            "{} is not a transaction",
            id
        )))),
    }
}

async fn get_hosts(State(state): State<AppState>) -> ApiResult<Vec<HostDisplayInfo>> {
    Ok(Json(state.explorer.active_hosts().await?))
}

async fn get_status(State(state): State<AppState>) -> ApiResult<ExplorerStatus> {
    Ok(Json(state.explorer.ledger().fetch_status().await?))
}

async fn get_overview(State(state): State<AppState>) -> ApiResult<Overview> {
    Ok(Json(state.explorer.overview(state.overview_blocks).await?))
}

/// Healthy when the daemon answers a version query.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();
    match state.explorer.ledger().fetch_version().await {
        Ok(version) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "daemon_version": version,
                "timestamp": timestamp,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "daemon unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "error": e.to_string(),
                    "timestamp": timestamp,
                })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct HeightQuery {
    h: Option<String>,
}

/// `/height?h=<n>` answers with a permanent redirect to the block's hash page.
async fn redirect_height(
    State(state): State<AppState>,
    Query(query): Query<HeightQuery>,
) -> Result<Response, ApiError> {
    let raw = query.h.ok_or_else(|| {
        ApiError(ExplorerError::InvalidInput(
            "missing query parameter h".to_string(),
        ))
    })?;
    let height = parse_height(&raw)?;
    let summary = state.explorer.block_summary(height).await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, format!("/api/hash/{}", summary.id))],
    )
        .into_response())
}
