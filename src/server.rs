//! Router and listener setup.
//!
//! ```text
//! /                      - liveness text
//! /api/health            - liveness + registry summary
//! /api/jobs              - GET list, POST create
//! /api/jobs/{id}         - GET, PUT, DELETE
//! /api/analytics         - GET arc-time report
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::analytics::{ArcTimeSource, SyntheticArcTime};
use crate::commands::{analytics, health, jobs};
use crate::jobs::JobRegistry;

/// Shared handler state. Built once at start-up and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<JobRegistry>,
    pub analytics: Arc<dyn ArcTimeSource>,
}

impl AppState {
    pub fn new(registry: JobRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            analytics: Arc::new(SyntheticArcTime),
        }
    }

    /// Replace the arc-time source.
    pub fn with_analytics(mut self, source: Arc<dyn ArcTimeSource>) -> Self {
        self.analytics = source;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::run_health_check))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/api/jobs/{id}",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route("/api/analytics", get(analytics::get_analytics))
        .with_state(state)
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on {}", addr);
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
