//! HTTP surface
//!
//! - `/nic/update`: any method, triggers one orchestration, always 200
//! - `/health-check`: `{"status":"ok"}`

use axum::Router;
use axum::routing::{any, get};
use r53_ddns_core::UpdateOrchestrator;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod handlers;
mod logging;

/// Shared handler state
pub type AppState = Arc<UpdateOrchestrator>;

/// Build the routes for the API
pub fn router(orchestrator: AppState) -> Router {
    Router::new()
        .route("/nic/update", any(handlers::nic_update))
        .route("/health-check", get(handlers::health_check))
        .layer(logging::layer())
        .with_state(orchestrator)
}

/// Serve `app` on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish after the signal.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
