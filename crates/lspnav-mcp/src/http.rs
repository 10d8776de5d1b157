//! HTTP transport for the MCP server.
//!
//! Reuses the stdio dispatch. Routes:
//! - `GET /health`: liveness and uptime
//! - `POST /`: one JSON-RPC message per request

use crate::error::McpError;
use crate::protocol::JsonRpcRequest;
use crate::server::McpServer;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lspnav_core::error::ProtocolErrorCode;
use lspnav_query::provider::CodeIntelligenceProvider;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared state for the HTTP transport.
pub struct HttpState<P> {
    pub server: McpServer<P>,
    pub server_start: Instant,
}

impl<P> HttpState<P> {
    pub fn new(server: McpServer<P>) -> Self {
        Self {
            server,
            server_start: Instant::now(),
        }
    }
}

pub fn router<P>(state: Arc<HttpState<P>>) -> Router
where
    P: CodeIntelligenceProvider + 'static,
{
    Router::new()
        .route("/health", get(health_handler::<P>))
        .route("/", post(jsonrpc_handler::<P>))
        .with_state(state)
}

/// Serve until the listener fails. Bind errors surface immediately.
pub async fn run_http_server<P>(
    server: McpServer<P>,
    bind_addr: &str,
    port: u16,
) -> Result<(), McpError>
where
    P: CodeIntelligenceProvider + 'static,
{
    let addr = format!("{}:{}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        workspace = %server.workspace().display(),
        "MCP HTTP server listening on {}",
        addr
    );
    let app = router(Arc::new(HttpState::new(server)));
    axum::serve(listener, app).await?;
    Ok(())
}

/// GET /health
async fn health_handler<P>(State(state): State<Arc<HttpState<P>>>) -> impl IntoResponse
where
    P: CodeIntelligenceProvider + 'static,
{
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "workspace": state.server.workspace().display().to_string(),
        "uptime_seconds": state.server_start.elapsed().as_secs(),
    }))
}

/// POST /
async fn jsonrpc_handler<P>(State(state): State<Arc<HttpState<P>>>, body: Bytes) -> Response
where
    P: CodeIntelligenceProvider + 'static,
{
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            let body = json!({
                "error": {
                    "code": ProtocolErrorCode::InvalidInput.as_str(),
                    "message": format!("Invalid JSON request body: {}", e),
                }
            });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match state.server.handle_request(&request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
