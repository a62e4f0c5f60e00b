//! HTTP Server - Greeting and Metrics Endpoints
//!
//! Serves `/` (an instrumented "Hello, world!" handler) and `/metrics`
//! (Prometheus text exposition, any method) via axum 0.7. The greeting
//! handler also answers every other method and unmatched path, each
//! counted in `http_requests_total` under its real status and method.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};

use crate::adapters::metrics::MetricsRegistry;

/// Body returned by the greeting handler.
pub const GREETING: &str = "Hello, world!";

/// Axum-based HTTP server for the greeting and metrics endpoints.
pub struct HttpServer {
    /// Registry shared with the sampler and the instrumentation layer.
    metrics: Arc<MetricsRegistry>,
}

impl HttpServer {
    /// Create a new server backed by the given registry.
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let greeting = Router::new()
            .route("/", any(hello))
            .fallback(hello)
            .layer(middleware::from_fn_with_state(
                Arc::clone(&self.metrics),
                count_requests,
            ));

        Router::new()
            .route("/metrics", any(render_metrics))
            .with_state(Arc::clone(&self.metrics))
            .merge(greeting)
    }

    /// Bind `bind_address` and serve until the listener fails.
    pub async fn bind_and_serve(self, bind_address: &str) -> Result<()> {
        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("Failed to bind {bind_address}"))?;
        self.run(listener, None).await
    }

    /// Serve on an already-bound listener.
    ///
    /// Without a shutdown receiver the server only returns on failure.
    #[instrument(skip_all)]
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: Option<broadcast::Receiver<()>>,
    ) -> Result<()> {
        let address = listener.local_addr().context("Listener has no address")?;
        let app = self.router();

        info!(address = %address, "Starting HTTP server");

        let served = match shutdown_rx {
            Some(mut shutdown_rx) => {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.recv().await;
                    })
                    .await
            }
            None => axum::serve(listener, app).await,
        };
        served.context("HTTP server failed")?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Greeting handler.
async fn hello() -> &'static str {
    GREETING
}

/// Count every response by status code and request method.
async fn count_requests(
    State(metrics): State<Arc<MetricsRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let response = next.run(request).await;
    metrics.increment(response.status().as_u16(), method.as_str());
    response
}

/// Prometheus scrape handler.
async fn render_metrics(State(metrics): State<Arc<MetricsRegistry>>) -> Response {
    match metrics.render() {
        Ok(body) => ([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render metrics").into_response()
        }
    }
}
