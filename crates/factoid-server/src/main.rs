//! Factoid server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `FACTOID_*`
//! environment variables, opens the SQLite store and serves the JSON API
//! over HTTP. Prometheus metrics are exposed at `/metrics`.

mod config;
mod prometheus;

use std::{future::IntoFuture as _, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use axum::routing::get;
use clap::Parser;
use factoid_api::AuthConfig;
use factoid_core::telemetry::{MetricsSink, NoopMetrics};
use factoid_store_sqlite::SqliteStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::{net::TcpListener, sync::Notify};
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{config::ServerConfig, prometheus::PrometheusMetrics};

/// How often histogram buckets are drained on the installed recorder.
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(author, version, about = "Factoid HTTP server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  tracing::info!(
    store_path = %cfg.store_path.display(),
    auth = !cfg.auth_secret.is_empty(),
    metrics = cfg.metrics_enabled,
    "properties"
  );

  // Metrics sink, plus the scrape handle when exporting.
  let (sink, handle): (Arc<dyn MetricsSink>, Option<PrometheusHandle>) = if cfg.metrics_enabled {
    let (sink, handle) =
      PrometheusMetrics::install().context("failed to install Prometheus recorder")?;
    spawn_upkeep(handle.clone());
    (Arc::new(sink), Some(handle))
  } else {
    (Arc::new(NoopMetrics), None)
  };

  let store = if cfg.is_in_memory() {
    SqliteStore::open_in_memory()
      .await
      .context("failed to open in-memory store")?
  } else {
    let path = cfg.resolved_store_path();
    SqliteStore::open(&path)
      .await
      .with_context(|| format!("failed to open store at {path:?}"))?
  };
  let store = Arc::new(store.with_metrics(sink.clone()));

  let mut app = factoid_api::router(store, AuthConfig::new(cfg.auth_secret.clone()), sink);
  if let Some(handle) = handle {
    app = app.route("/metrics", get(move || std::future::ready(handle.render())));
  }
  let app = app.layer(TraceLayer::new_for_http());

  let address = cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!(http_addr = %address, "listening");

  serve(listener, app, cfg.shutdown_grace()).await
}

fn spawn_upkeep(handle: PrometheusHandle) {
  tokio::spawn(async move {
    let mut tick = tokio::time::interval(UPKEEP_INTERVAL);
    loop {
      tick.tick().await;
      handle.run_upkeep();
    }
  });
}

/// Serve until the first Ctrl-C, then drain in-flight requests for at most
/// `grace`. A second Ctrl-C abandons the drain.
async fn serve(listener: TcpListener, app: axum::Router, grace: Duration) -> anyhow::Result<()> {
  let shutdown = Arc::new(Notify::new());
  let signal = shutdown.clone();

  let server = axum::serve(listener, app)
    .with_graceful_shutdown(async move { signal.notified().await })
    .into_future();
  let mut server = std::pin::pin!(server);

  tokio::select! {
    res = &mut server => return res.context("server error"),
    res = tokio::signal::ctrl_c() => res.context("failed to listen for Ctrl-C")?,
  }

  tracing::info!("attempting graceful shutdown, send SIGINT again to cancel");
  shutdown.notify_one();

  tokio::select! {
    res = &mut server => {
      res.context("server error")?;
      tracing::info!("shut down");
    }
    _ = tokio::time::sleep(grace) => {
      tracing::warn!(?grace, "shut down: grace period elapsed with requests in flight");
    }
    _ = tokio::signal::ctrl_c() => {
      tracing::warn!("shut down: graceful shutdown cancelled");
    }
  }
  Ok(())
}
