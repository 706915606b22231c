//! # codeshot-server
//!
//! HTTP surface of a CodeShot agent:
//!
//! - `GET /` — handshake: the agent's metadata as JSON, or YAML when the
//!   client sends `Accept: application/yaml`
//! - `POST /{func_name}` — run one Func on an `AgentQuery`, answer with an
//!   `AgentResponse`
//!
//! Errors are returned as `{"detail": "..."}`.

pub mod refresh;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use codeshot_agent::CodeShotAgent;
use codeshot_config::schema::ServerConfig;
use codeshot_core::{AgentQuery, AgentResponse, CodeShotError};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

pub use refresh::{ping_refresh, spawn_refresh_ping};

/// Shared server state.
pub struct AppState {
    pub agent: Arc<CodeShotAgent>,
}

/// An error response: status plus a `detail` message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<CodeShotError> for ApiError {
    fn from(err: CodeShotError) -> Self {
        match err {
            CodeShotError::FuncNotFound(_) => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            CodeShotError::FuncForbidden(_) => {
                ApiError::new(StatusCode::FORBIDDEN, err.to_string())
            }
            other => {
                // Func bugs and Func-raised errors: log the cause, keep it off the wire.
                error!(error = %other, "func failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Build the Axum router around an agent whose Funcs are all registered.
pub fn build_router(agent: Arc<CodeShotAgent>, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState { agent });

    let mut router = Router::new()
        .route("/", get(handshake_handler))
        .route("/{func_name}", post(func_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Whether the client asked for YAML rather than JSON.
fn wants_yaml(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| {
            accept.split(',').any(|part| {
                let media = part.split(';').next().unwrap_or("").trim();
                matches!(media, "application/yaml" | "application/x-yaml" | "text/yaml")
            })
        })
}

async fn handshake_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let metadata = state.agent.metadata();
    if wants_yaml(&headers) {
        let body = serde_yaml::to_string(metadata).map_err(|e| {
            error!(error = %e, "failed to render handshake as YAML");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        })?;
        debug!("handshake served as YAML");
        return Ok(([(header::CONTENT_TYPE, "application/yaml")], body).into_response());
    }
    Ok(Json(metadata).into_response())
}

/// Extract the bearer credential from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn func_handler(
    State(state): State<Arc<AppState>>,
    Path(func_name): Path<String>,
    headers: HeaderMap,
    Json(mut query): Json<AgentQuery>,
) -> Result<Json<AgentResponse>, ApiError> {
    let Some(token) = bearer_token(&headers) else {
        warn!(func = %func_name, "func call without bearer token");
        return Err(ApiError::new(StatusCode::FORBIDDEN, "Not authenticated"));
    };

    match query.access_token.as_deref() {
        Some(existing) if existing != token => {
            warn!(func = %func_name, "query token does not match bearer token");
            return Err(ApiError::new(StatusCode::FORBIDDEN, "Mismatched tokens"));
        }
        _ => query.access_token = Some(token.to_string()),
    }

    let response = state.agent.dispatch(&func_name, query).await?;
    Ok(Json(response))
}

/// Start the HTTP server. When `refresh_url` is given and the agent has an
/// id, the platform is asked to refresh the agent once the listener is up.
pub async fn start_server(
    agent: Arc<CodeShotAgent>,
    config: ServerConfig,
    refresh_url: Option<String>,
) -> codeshot_core::Result<()> {
    let listen = config.listen.clone();
    let router = build_router(agent.clone(), &config);

    info!(listen = %listen, funcs = ?agent.registry().exposed_names(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .map_err(|e| CodeShotError::Config(format!("failed to bind {}: {}", listen, e)))?;

    if config.refresh_on_start {
        match (refresh_url, agent.agent_id()) {
            (Some(url), Some(agent_id)) => {
                spawn_refresh_ping(url, agent_id.to_string());
            }
            _ => debug!("no agent id configured, skipping refresh ping"),
        }
    }

    axum::serve(listener, router)
        .await
        .map_err(|e| CodeShotError::Transport(format!("server error: {}", e)))?;

    Ok(())
}
