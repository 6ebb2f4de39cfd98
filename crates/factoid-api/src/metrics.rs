//! Golden-signal middleware wrapped around the whole route table.
//!
//! The observed status is whatever the inner service finally returned,
//! whether it came from a handler, the auth gate, or the router itself.

use std::{sync::Arc, time::Instant};

use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};
use factoid_core::telemetry::{MetricsSink, RequestOutcome};

/// Decrements the in-flight gauge when dropped, so an abandoned request
/// does not leave the gauge raised.
struct InflightGuard<'a>(&'a dyn MetricsSink);

impl<'a> InflightGuard<'a> {
  fn enter(metrics: &'a dyn MetricsSink) -> Self {
    metrics.inflight_add(1.0);
    Self(metrics)
  }
}

impl Drop for InflightGuard<'_> {
  fn drop(&mut self) { self.0.inflight_add(-1.0); }
}

/// Middleware: count, time and classify every request.
pub async fn track_metrics(
  State(metrics): State<Arc<dyn MetricsSink>>,
  req: Request,
  next: Next,
) -> Response {
  let start = Instant::now();
  metrics.total_requests_inc();
  let inflight = InflightGuard::enter(&*metrics);

  let response = next.run(req).await;

  let elapsed = start.elapsed();
  let status = response.status().as_u16();
  drop(inflight);

  metrics.total_responses_inc(status);
  metrics.request_time_inc(elapsed);
  metrics.request_latency(RequestOutcome::from_status(status), elapsed);

  response
}
