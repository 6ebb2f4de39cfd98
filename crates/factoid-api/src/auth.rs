//! Shared-secret gate for mutating routes.

use std::sync::Arc;

use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// The secret a client must present verbatim in `Authorization`.
///
/// An empty secret disables the gate.
#[derive(Clone, Default)]
pub struct AuthConfig {
  pub secret: String,
}

impl AuthConfig {
  pub fn new(secret: impl Into<String>) -> Self { Self { secret: secret.into() } }

  pub fn is_enabled(&self) -> bool { !self.secret.is_empty() }

  /// Compare the raw `Authorization` header against the configured secret.
  /// No scheme prefix is parsed.
  pub fn verify(&self, headers: &HeaderMap) -> Result<(), ApiError> {
    if !self.is_enabled() {
      return Ok(());
    }

    let presented = headers
      .get(header::AUTHORIZATION)
      .map(|v| v.as_bytes())
      .unwrap_or_default();

    if presented == self.secret.as_bytes() {
      Ok(())
    } else {
      Err(ApiError::Forbidden)
    }
  }
}

/// Middleware: short-circuit with 403 unless [`AuthConfig::verify`] passes.
pub async fn require_secret(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Response {
  match auth.verify(req.headers()) {
    Ok(()) => next.run(req).await,
    Err(e) => {
      tracing::debug!(
        http_method = %req.method(),
        request_uri = %req.uri(),
        "rejected request without a matching secret"
      );
      e.into_response()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers(auth: Option<&'static str>) -> HeaderMap {
    let mut h = HeaderMap::new();
    if let Some(v) = auth {
      h.insert(header::AUTHORIZATION, HeaderValue::from_static(v));
    }
    h
  }

  #[test]
  fn disabled_gate_lets_everything_through() {
    let cfg = AuthConfig::default();
    assert!(!cfg.is_enabled());
    assert!(cfg.verify(&headers(None)).is_ok());
    assert!(cfg.verify(&headers(Some("anything"))).is_ok());
  }

  #[test]
  fn matching_secret() {
    let cfg = AuthConfig::new("hunter2");
    assert!(cfg.verify(&headers(Some("hunter2"))).is_ok());
  }

  #[test]
  fn wrong_secret() {
    let cfg = AuthConfig::new("hunter2");
    assert!(matches!(cfg.verify(&headers(Some("hunter3"))), Err(ApiError::Forbidden)));
  }

  #[test]
  fn missing_header() {
    let cfg = AuthConfig::new("hunter2");
    assert!(matches!(cfg.verify(&headers(None)), Err(ApiError::Forbidden)));
  }

  #[test]
  fn scheme_prefix_is_not_stripped() {
    let cfg = AuthConfig::new("hunter2");
    assert!(matches!(
      cfg.verify(&headers(Some("Bearer hunter2"))),
      Err(ApiError::Forbidden)
    ));
  }
}
