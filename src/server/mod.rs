//! HTTP benchmark service
//!
//! Exposes the isolated runner over HTTP. Each request builds a fresh result
//! set on a blocking thread and answers with the results plus a description
//! of the serving environment.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::bench::{Registry, Runner};
use crate::config::{BenchmarkConfig, ServerConfig, WorkloadSizes};
use crate::models::{RemoteReport, SystemInfo};
use crate::{CpurbError, Result, BENCHMARK_ROUTE};

/// Shared state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub sizes: WorkloadSizes,
    pub server: ServerConfig,
}

impl AppState {
    /// Standard registry with the server sizes from `config`
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self {
            registry: Arc::new(Registry::standard()),
            sizes: config.remote_sizes(),
            server: config.server.clone(),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route(BENCHMARK_ROUTE, get(benchmark_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn root_handler() -> &'static str {
    concat!(
        "cpurb ",
        env!("CARGO_PKG_VERSION"),
        " - GET /api/benchmark runs the CPU benchmark\n"
    )
}

async fn benchmark_handler(State(state): State<AppState>) -> Response {
    let AppState {
        registry,
        sizes,
        server,
    } = state;

    let outcome = tokio::task::spawn_blocking(move || {
        let results = Runner::new(&registry, sizes).run_isolated();
        RemoteReport {
            results,
            system_info: SystemInfo::detect_server(&server),
        }
    })
    .await;

    match outcome {
        Ok(report) => {
            tracing::info!(
                workloads = report.results.len(),
                failed = report.results.failed_count(),
                score = report.results.performance_score(),
                "Benchmark request served"
            );
            ([(header::CACHE_CONTROL, "no-store")], Json(report)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Benchmark task did not complete");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CACHE_CONTROL, "no-store")],
                "Benchmark task did not complete",
            )
                .into_response()
        }
    }
}

/// Bind to the configured address and serve until Ctrl+C
pub async fn serve(config: &BenchmarkConfig) -> Result<()> {
    let addr = config.server.bind_address();
    let app = router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CpurbError::ServerError(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, route = BENCHMARK_ROUTE, "Starting benchmark server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CpurbError::ServerError(e.to_string()))?;

    tracing::info!("Benchmark server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
