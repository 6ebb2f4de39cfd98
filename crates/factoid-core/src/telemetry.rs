//! The `MetricsSink` trait and the label types it is called with.
//!
//! The sink is injected wherever observations are made (HTTP middleware,
//! storage backends) rather than reached through a global registry. The
//! Prometheus implementation lives in `factoid-server`.

use std::time::Duration;

use strum::{Display, IntoStaticStr};

// ─── Labels ──────────────────────────────────────────────────────────────────

/// Outcome of a request, used as the `status` label on latency metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum RequestOutcome {
  Success,
  Fail,
  Reject,
}

impl RequestOutcome {
  /// Classify an HTTP status code: 5xx fails, 4xx rejects, everything else
  /// succeeds.
  pub fn from_status(status: u16) -> Self {
    match status {
      500.. => Self::Fail,
      400..=499 => Self::Reject,
      _ => Self::Success,
    }
  }

  /// Outcome of a call to an upstream dependency.
  pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
    if result.is_ok() { Self::Success } else { Self::Fail }
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

/// A dependency the service calls while handling a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Upstream {
  Repo,
}

impl Upstream {
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Receiver for golden-signal and upstream observations.
///
/// Implementations must be safe to call concurrently from many requests.
pub trait MetricsSink: Send + Sync + 'static {
  // ── Golden signals ────────────────────────────────────────────────────

  fn total_requests_inc(&self);

  /// Count a response, labeled with its numeric status code.
  fn total_responses_inc(&self, status: u16);

  /// Adjust the in-flight gauge by `delta` (`1.0` on entry, `-1.0` on exit).
  fn inflight_add(&self, delta: f64);

  /// Add to the cumulative processing-time counter.
  fn request_time_inc(&self, elapsed: Duration);

  fn request_latency(&self, outcome: RequestOutcome, latency: Duration);

  // ── Upstream dependencies ─────────────────────────────────────────────

  fn upstream_requests_inc(&self, upstream: Upstream);

  fn upstream_responses_inc(&self, upstream: Upstream, outcome: RequestOutcome);

  fn upstream_request_latency(
    &self,
    upstream: Upstream,
    outcome: RequestOutcome,
    latency: Duration,
  );
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
  fn total_requests_inc(&self) {}

  fn total_responses_inc(&self, _: u16) {}

  fn inflight_add(&self, _: f64) {}

  fn request_time_inc(&self, _: Duration) {}

  fn request_latency(&self, _: RequestOutcome, _: Duration) {}

  fn upstream_requests_inc(&self, _: Upstream) {}

  fn upstream_responses_inc(&self, _: Upstream, _: RequestOutcome) {}

  fn upstream_request_latency(&self, _: Upstream, _: RequestOutcome, _: Duration) {}
}
