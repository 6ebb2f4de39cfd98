//! [`MetricsSink`] backed by the `metrics` facade and the Prometheus exporter.

use std::time::Duration;

use factoid_core::telemetry::{MetricsSink, RequestOutcome, Upstream};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const HTTP_REQUESTS_TOTAL: &str = "factoid_http_requests_total";
pub const HTTP_RESPONSES_TOTAL: &str = "factoid_http_responses_total";
pub const HTTP_REQUESTS_INFLIGHT: &str = "factoid_http_requests_inflight";
pub const HTTP_TOTAL_REQUEST_TIME_SECONDS: &str = "factoid_http_total_request_time_seconds";
pub const HTTP_REQUEST_LATENCY_SECONDS: &str = "factoid_http_request_latency_seconds";
pub const UPSTREAM_REQUESTS_TOTAL: &str = "factoid_upstream_requests_total";
pub const UPSTREAM_RESPONSES_TOTAL: &str = "factoid_upstream_responses_total";
pub const UPSTREAM_REQUEST_LATENCY_SECONDS: &str = "factoid_upstream_request_latency_seconds";

/// Prometheus' default histogram buckets, in seconds.
const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Writes through the global `metrics` recorder. Install one with
/// [`PrometheusMetrics::install`] before serving.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetrics;

impl PrometheusMetrics {
  /// Install the process-wide Prometheus recorder and describe every metric.
  /// The returned handle renders the scrape body.
  pub fn install() -> Result<(Self, PrometheusHandle), BuildError> {
    let handle = builder()?.install_recorder()?;
    describe();
    Ok((Self, handle))
  }
}

fn builder() -> Result<PrometheusBuilder, BuildError> {
  PrometheusBuilder::new().set_buckets(LATENCY_BUCKETS)
}

fn describe() {
  describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of requests received");
  describe_counter!(HTTP_RESPONSES_TOTAL, "Total number of responses sent");
  describe_gauge!(HTTP_REQUESTS_INFLIGHT, "Number of requests being executed right now");
  describe_gauge!(
    HTTP_TOTAL_REQUEST_TIME_SECONDS,
    "Time spent servicing all completed requests in seconds"
  );
  describe_histogram!(HTTP_REQUEST_LATENCY_SECONDS, "Request latencies by outcome");
  describe_counter!(UPSTREAM_REQUESTS_TOTAL, "Requests made to upstream dependencies");
  describe_counter!(UPSTREAM_RESPONSES_TOTAL, "Responses from upstream dependencies");
  describe_histogram!(
    UPSTREAM_REQUEST_LATENCY_SECONDS,
    "Request latencies to upstream dependencies"
  );
}

impl MetricsSink for PrometheusMetrics {
  fn total_requests_inc(&self) { counter!(HTTP_REQUESTS_TOTAL).increment(1); }

  fn total_responses_inc(&self, status: u16) {
    counter!(HTTP_RESPONSES_TOTAL, "status" => status.to_string()).increment(1);
  }

  fn inflight_add(&self, delta: f64) { gauge!(HTTP_REQUESTS_INFLIGHT).increment(delta); }

  // `metrics` counters are integral, so fractional seconds accumulate in a
  // gauge that only ever grows.
  fn request_time_inc(&self, elapsed: Duration) {
    gauge!(HTTP_TOTAL_REQUEST_TIME_SECONDS).increment(elapsed.as_secs_f64());
  }

  fn request_latency(&self, outcome: RequestOutcome, latency: Duration) {
    histogram!(HTTP_REQUEST_LATENCY_SECONDS, "status" => outcome.as_str())
      .record(latency.as_secs_f64());
  }

  fn upstream_requests_inc(&self, upstream: Upstream) {
    counter!(UPSTREAM_REQUESTS_TOTAL, "upstream" => upstream.as_str()).increment(1);
  }

  fn upstream_responses_inc(&self, upstream: Upstream, outcome: RequestOutcome) {
    counter!(
      UPSTREAM_RESPONSES_TOTAL,
      "upstream" => upstream.as_str(),
      "status" => outcome.as_str()
    )
    .increment(1);
  }

  fn upstream_request_latency(
    &self,
    upstream: Upstream,
    outcome: RequestOutcome,
    latency: Duration,
  ) {
    histogram!(
      UPSTREAM_REQUEST_LATENCY_SECONDS,
      "upstream" => upstream.as_str(),
      "status" => outcome.as_str()
    )
    .record(latency.as_secs_f64());
  }
}
