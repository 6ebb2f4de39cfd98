//! JSON REST API for Factoid.
//!
//! Exposes an axum [`Router`] backed by any [`factoid_core::store::FactStore`].
//! Every request passes through the golden-signal middleware; mutating routes
//! additionally pass through the shared-secret gate. TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = factoid_api::router(store, AuthConfig::new(secret), metrics);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod error;
pub mod facts;
pub mod metrics;

use std::sync::Arc;

use axum::{
  Router,
  middleware,
  routing::{delete, get, post},
};
use factoid_core::{store::FactStore, telemetry::MetricsSink};

pub use auth::AuthConfig;
pub use error::ApiError;

/// Build the fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn router<S>(store: Arc<S>, auth: AuthConfig, sink: Arc<dyn MetricsSink>) -> Router<()>
where
  S: FactStore + 'static,
{
  let gate = middleware::from_fn_with_state(Arc::new(auth), auth::require_secret);

  Router::new()
    .route(
      "/v1/facts",
      get(facts::list::<S>).merge(post(facts::create::<S>).route_layer(gate.clone())),
    )
    .route(
      "/v1/fact/{id}",
      get(facts::get_one::<S>).merge(delete(facts::delete_one::<S>).route_layer(gate)),
    )
    .with_state(store)
    .layer(middleware::from_fn_with_state(sink, metrics::track_metrics))
}
