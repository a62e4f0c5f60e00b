//! Hello Metrics — Entry Point
//!
//! Wiring sequence:
//! 1. Load config.toml if present, else built-in defaults
//! 2. Init tracing (JSON structured logging)
//! 3. Build the Prometheus registry (fatal on registration failure)
//! 4. Spawn the random sampler and the self-poller
//! 5. Serve `/` and `/metrics` on :1234 until the listener fails
//! 6. Stop the background loops and exit

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use hello_metrics::adapters::http::{HttpServer, HttpTarget};
use hello_metrics::adapters::metrics::MetricsRegistry;
use hello_metrics::config;
use hello_metrics::ports::PollTarget;
use hello_metrics::usecases::TaskSupervisor;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_or_default(CONFIG_PATH)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        "Starting hello-metrics"
    );
    info!(
        config_file = CONFIG_PATH,
        file_present = Path::new(CONFIG_PATH).exists(),
        target_url = %config.poller.target_url,
        max_sleep_seconds = config.poller.max_sleep_seconds,
        "Configuration loaded"
    );

    // ── 3. Metrics registry shared by every component ───────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);

    // ── 4. Background loops ─────────────────────────────────
    let target: Arc<dyn PollTarget> = Arc::new(
        HttpTarget::new(config.poller.target_url.clone())
            .context("Failed to create self-poll client")?,
    );
    let supervisor = TaskSupervisor::new(
        Arc::clone(&metrics),
        target,
        config.poller.max_sleep_seconds,
    );
    let tasks = supervisor.spawn();

    // ── 5. Serve until the listener fails ───────────────────
    let server = HttpServer::new(Arc::clone(&metrics));
    if let Err(e) = server.bind_and_serve(&config.server.bind_address).await {
        let chain = format!("{e:#}");
        error!(error = %chain, "HTTP server exited");
    }

    // ── 6. Stop background loops ────────────────────────────
    supervisor.shutdown();
    let samples = tasks.join().await;
    info!(samples, "Shutdown complete");
    Ok(())
}
