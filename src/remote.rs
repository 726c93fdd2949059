//! Client for the remote benchmark endpoint

use std::time::Duration;

use crate::models::RemoteReport;
use crate::{CpurbError, Result, APP_NAME};

/// Server runs take a few seconds; allow generous headroom
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client fetching a [`RemoteReport`]
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
}

impl RemoteClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Request a fresh server run and decode the response
    pub async fn fetch(&self, url: &str) -> Result<RemoteReport> {
        tracing::info!(url, "Requesting remote benchmark");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CpurbError::RemoteError(format!(
                "Server responded with {}",
                status
            )));
        }

        let body = response.bytes().await?;
        let report: RemoteReport = serde_json::from_slice(&body)?;

        tracing::debug!(
            workloads = report.results.len(),
            failed = report.results.failed_count(),
            "Remote benchmark received"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::{Registry, WorkloadSpec};
    use crate::config::{ServerConfig, WorkloadSizes};
    use crate::models::{BenchmarkResult, PrimaryOutput};
    use crate::server::{router, AppState};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::sync::Arc;

    fn quick(_: &WorkloadSizes) -> Result<BenchmarkResult> {
        Ok(BenchmarkResult::new(
            "quick",
            Duration::from_millis(4),
            PrimaryOutput::Count(1),
            4.0,
        ))
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_decodes_report() {
        let state = AppState {
            registry: Arc::new(Registry::new(vec![WorkloadSpec::new("Quick", quick)]).unwrap()),
            sizes: crate::config::ExecutionMode::Lite.sizes(),
            server: ServerConfig::default(),
        };
        let base = spawn(router(state)).await;

        let client = RemoteClient::new().unwrap();
        let report = client
            .fetch(&format!("{}{}", base, crate::BENCHMARK_ROUTE))
            .await
            .unwrap();
        assert_eq!(report.results.names(), vec!["Quick"]);
        assert_eq!(report.results.get("Quick").unwrap().ops_per_second, 1000.0);
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let app = Router::new().route(
            "/api/benchmark",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn(app).await;

        let err = RemoteClient::new()
            .unwrap()
            .fetch(&format!("{}/api/benchmark", base))
            .await;
        match err {
            Err(CpurbError::RemoteError(msg)) => assert!(msg.contains("500")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_body() {
        let app = Router::new().route("/api/benchmark", get(|| async { "not json" }));
        let base = spawn(app).await;

        let err = RemoteClient::new()
            .unwrap()
            .fetch(&format!("{}/api/benchmark", base))
            .await;
        assert!(matches!(err, Err(CpurbError::RemoteError(_))));
    }
}
