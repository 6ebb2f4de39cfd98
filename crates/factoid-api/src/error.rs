//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"error": "<message>"}`. Internal errors never
//! expose their cause to the client; callers log it before converting.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use factoid_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler or middleware.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed request input, reported verbatim.
  #[error("{0}")]
  BadRequest(&'static str),

  /// Input that decoded fine but failed domain validation.
  #[error(transparent)]
  Validation(#[from] factoid_core::Error),

  #[error("forbidden")]
  Forbidden,

  #[error("not found")]
  NotFound,

  #[error("internal error")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Split a store error into the domain not-found condition and everything
  /// else.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    if e.is_not_found() {
      Self::NotFound
    } else {
      Self::Internal(Box::new(e))
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
      Self::Forbidden => StatusCode::FORBIDDEN,
      Self::NotFound => StatusCode::NOT_FOUND,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    // `Display` for `Internal` is the generic message, not the cause.
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}
