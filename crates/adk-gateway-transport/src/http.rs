//! HTTP transport.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    gateway::Gateway,
    protocol::{ToolRequest, ToolResponse},
};

async fn tools_handler(
    State(gateway): State<Arc<Gateway>>,
    Json(req): Json<ToolRequest>,
) -> Json<ToolResponse> {
    let text = gateway.call(req.call).await;
    Json(ToolResponse::new(req.id, text))
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Create the tool router.
///
/// # Example
/// ```ignore
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, create_router(gateway)).await?;
/// ```
#[must_use]
pub fn create_router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/tools", post(tools_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

/// Serve the tool router on `addr` until the listener fails.
///
/// # Errors
/// Returns error if the address cannot be bound.
pub async fn serve_http(gateway: Arc<Gateway>, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving tools on http://{}", listener.local_addr()?);
    axum::serve(listener, create_router(gateway)).await
}
