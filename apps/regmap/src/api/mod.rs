//! # regmap HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! One shared session backs all requests; there is no per-client view state.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Graph statistics and view-state summary
//! - `GET /view` - Visible nodes with positions, visible edges, breadcrumb
//! - `GET /breadcrumb` - Breadcrumb of the current selection
//! - `POST /nodes/activate` - Select and expand a node
//! - `POST /nodes/toggle` - Expand or collapse a node
//! - `GET /nodes/{id}/relations` - Incoming and outgoing relations
//! - `POST /view/expand-all` - Expand every node
//! - `POST /view/reset` - Clear expansion and selection
//! - `POST /selection/clear` - Clear the selection only
//! - `POST /snapshot` - Replace the loaded snapshot
//! - `GET /export` - Canonical snapshot with checksum and hash
//!
//! ## Security Configuration
//!
//! CORS origins and the rate limit come from [`ServerConfig`], which the
//! `REGMAP_CORS_ORIGINS` and `REGMAP_RATE_LIMIT` environment variables
//! override.

mod handlers;
mod middleware;
mod types;

pub use handlers::{build_view, error_status};
pub use middleware::{create_rate_limiter, limiter_for};
pub use types::{
    ActivateResponse, BreadcrumbJson, CrumbJson, EdgeJson, ExportResponse, HealthResponse,
    NodeJson, NodeRequest, RelationJson, RelationsResponse, SnapshotResponse, StatusResponse,
    ToggleResponse, ViewResponse, ViewStateResponse, expand_hint, relation_color,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use regmap_core::{RegmapError, Session};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body; a full snapshot upload is the biggest.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the view session.
#[derive(Clone)]
pub struct AppState {
    /// The session containing the graph and view state.
    pub session: Arc<RwLock<Session>>,
    /// Settings the router is built from.
    pub server: ServerConfig,
}

impl AppState {
    /// App state with server settings from defaults and environment.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self::with_config(session, ServerConfig::from_env())
    }

    #[must_use]
    pub fn with_config(session: Session, server: ServerConfig) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            server,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: allow all origins
/// - empty: localhost only
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", origin);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        build_localhost_cors()
    } else {
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.server.cors_origins);
    let rate_limiter = limiter_for(state.server.rate_limit);

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/view", get(handlers::view_handler))
        .route("/breadcrumb", get(handlers::breadcrumb_handler))
        .route("/nodes/activate", post(handlers::activate_handler))
        .route("/nodes/toggle", post(handlers::toggle_handler))
        .route("/nodes/{id}/relations", get(handlers::relations_handler))
        .route("/view/expand-all", post(handlers::expand_all_handler))
        .route("/view/reset", post(handlers::reset_handler))
        .route("/selection/clear", post(handlers::clear_selection_handler))
        .route("/snapshot", post(handlers::snapshot_handler))
        .route("/export", get(handlers::export_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server on `server.addr()`.
pub async fn run_server(server: ServerConfig, session: Session) -> Result<(), RegmapError> {
    let addr = server.addr();
    let router = create_router(AppState::with_config(session, server));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RegmapError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("regmap HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| RegmapError::IoError(format!("Server error: {}", e)))
}
