//! Handlers for `/v1/facts` and `/v1/fact/{id}`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/v1/facts` | All live facts |
//! | `POST`   | `/v1/facts` | Body: [`CreateBody`]; returns 201 + stored fact |
//! | `GET`    | `/v1/fact/{id}` | `id` is an integer or `rand` |
//! | `DELETE` | `/v1/fact/{id}` | Soft delete; returns 204 |

use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
  http::{Method, StatusCode, Uri},
  response::IntoResponse,
};
use factoid_core::{
  fact::{Fact, NewFact},
  store::{FactStore, StoreError},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Path token that selects a random live fact.
pub const RANDOM_TOKEN: &str = "rand";

// ─── Envelopes ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct FactsEnvelope {
  pub facts: Vec<Fact>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FactEnvelope {
  pub fact: Fact,
}

// ─── Failure logging ──────────────────────────────────────────────────────────

/// Request details attached to the log line of a failed store call.
struct Failure<'a> {
  method:   &'a Method,
  uri:      &'a Uri,
  id_param: Option<&'a str>,
  input:    Option<&'a NewFact>,
}

impl<'a> Failure<'a> {
  fn new(method: &'a Method, uri: &'a Uri) -> Self {
    Self { method, uri, id_param: None, input: None }
  }

  fn id_param(mut self, id_param: &'a str) -> Self {
    self.id_param = Some(id_param);
    self
  }

  fn input(mut self, input: &'a NewFact) -> Self {
    self.input = Some(input);
    self
  }

  fn log(&self, op: &'static str, cause: &dyn std::error::Error) {
    tracing::error!(
      op,
      http_method = %self.method,
      request_uri = %self.uri,
      fact_param_id = self.id_param,
      create_fact_content = self.input.map(NewFact::content),
      create_fact_source = self.input.map(NewFact::source),
      error = %cause,
      "store call failed"
    );
  }

  /// A lookup: not-found passes through as 404, anything else is logged
  /// and becomes a 500.
  fn lookup<E: StoreError>(&self, op: &'static str, e: E) -> ApiError {
    let err = ApiError::from_store(e);
    if let ApiError::Internal(cause) = &err {
      self.log(op, cause.as_ref());
    }
    err
  }

  /// Any error is logged and becomes a 500.
  fn internal<E: StoreError>(&self, op: &'static str, e: E) -> ApiError {
    self.log(op, &e);
    ApiError::Internal(Box::new(e))
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /v1/facts`
pub async fn list<S: FactStore>(
  State(store): State<Arc<S>>,
  method: Method,
  uri: Uri,
) -> Result<Json<FactsEnvelope>, ApiError> {
  let facts = store
    .facts()
    .await
    .map_err(|e| Failure::new(&method, &uri).internal("facts", e))?;
  Ok(Json(FactsEnvelope { facts }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /v1/facts`. Absent and `null` fields decode as
/// empty.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub content: Option<String>,
  pub source:  Option<String>,
}

impl CreateBody {
  /// Decode a request body as JSON, whatever its declared content type.
  pub fn decode(body: &[u8]) -> Result<Self, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
      tracing::warn!(error = %e, "could not decode create body");
      ApiError::BadRequest("bad request")
    })
  }

  pub fn into_new_fact(self) -> Result<NewFact, ApiError> {
    Ok(NewFact::new(
      self.content.unwrap_or_default(),
      self.source.unwrap_or_default(),
    )?)
  }
}

/// `POST /v1/facts`: returns 201 + the stored [`Fact`].
pub async fn create<S: FactStore>(
  State(store): State<Arc<S>>,
  method: Method,
  uri: Uri,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
  let input = CreateBody::decode(&body)?.into_new_fact()?;

  let fact = store
    .create_fact(input.clone())
    .await
    .map_err(|e| Failure::new(&method, &uri).input(&input).internal("create_fact", e))?;

  Ok((StatusCode::CREATED, Json(FactEnvelope { fact })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// Target of `GET /v1/fact/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactRef {
  Id(i64),
  Random,
}

impl FactRef {
  /// `rand` wins over integer parsing; anything else is rejected.
  pub fn parse(param: &str) -> Result<Self, ApiError> {
    if param == RANDOM_TOKEN {
      return Ok(Self::Random);
    }
    param
      .parse()
      .map(Self::Id)
      .map_err(|_| ApiError::BadRequest("id must be an integer or 'rand'"))
  }
}

/// `GET /v1/fact/{id}` where `id` is an integer or `rand`.
pub async fn get_one<S: FactStore>(
  State(store): State<Arc<S>>,
  Path(id_param): Path<String>,
  method: Method,
  uri: Uri,
) -> Result<Json<FactEnvelope>, ApiError> {
  let failure = Failure::new(&method, &uri).id_param(&id_param);
  let fact = match FactRef::parse(&id_param)? {
    FactRef::Id(id) => store
      .fact(id)
      .await
      .map_err(|e| failure.lookup("fact", e))?,
    FactRef::Random => store
      .random_fact()
      .await
      .map_err(|e| failure.lookup("random_fact", e))?,
  };
  Ok(Json(FactEnvelope { fact }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /v1/fact/{id}`: soft delete, 204 on success.
///
/// The store does not report whether the delete touched a row, so existence
/// is checked first. The check and the delete are two separate store calls.
pub async fn delete_one<S: FactStore>(
  State(store): State<Arc<S>>,
  Path(id_param): Path<String>,
  method: Method,
  uri: Uri,
) -> Result<StatusCode, ApiError> {
  let id: i64 = id_param
    .parse()
    .map_err(|_| ApiError::BadRequest("id must be an integer"))?;
  let failure = Failure::new(&method, &uri).id_param(&id_param);

  store.fact(id).await.map_err(|e| failure.lookup("fact", e))?;
  store
    .delete_fact(id)
    .await
    .map_err(|e| failure.internal("delete_fact", e))?;

  Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_integer_ids() {
    assert_eq!(FactRef::parse("1").unwrap(), FactRef::Id(1));
    assert_eq!(FactRef::parse("9001").unwrap(), FactRef::Id(9001));
  }

  #[test]
  fn parses_rand_token() {
    assert_eq!(FactRef::parse("rand").unwrap(), FactRef::Random);
  }

  #[test]
  fn rejects_other_tokens() {
    for bad in ["asdf", "RAND", "1.5", ""] {
      let err = FactRef::parse(bad).unwrap_err();
      assert_eq!(err.to_string(), "id must be an integer or 'rand'", "input {bad:?}");
    }
  }

  #[test]
  fn null_and_absent_fields_decode_as_empty() {
    for body in [r#"{}"#, r#"{"content": null, "source": null}"#] {
      let decoded = CreateBody::decode(body.as_bytes()).unwrap();
      assert_eq!(decoded.content, None, "body {body}");
      assert!(matches!(
        decoded.into_new_fact(),
        Err(ApiError::Validation(factoid_core::Error::BlankContent))
      ));
    }
  }

  #[test]
  fn source_defaults_to_empty() {
    let input = CreateBody::decode(br#"{"content": "sloths can hold their breath"}"#)
      .unwrap()
      .into_new_fact()
      .unwrap();
    assert_eq!(input.source(), "");
  }

  #[derive(Debug, thiserror::Error)]
  #[error("no rows")]
  struct Missing;

  impl StoreError for Missing {
    fn is_not_found(&self) -> bool { true }
  }

  #[test]
  fn lookups_keep_not_found_but_other_calls_do_not() {
    let (method, uri) = (Method::DELETE, Uri::from_static("/v1/fact/9"));
    let failure = Failure::new(&method, &uri).id_param("9");

    assert!(matches!(failure.lookup("fact", Missing), ApiError::NotFound));
    assert!(matches!(failure.internal("delete_fact", Missing), ApiError::Internal(_)));
  }

  #[test]
  fn undecodable_bodies_are_bad_requests() {
    for body in ["", "{", r#"{"content": 5}"#, "content=x"] {
      let err = CreateBody::decode(body.as_bytes()).unwrap_err();
      assert_eq!(err.to_string(), "bad request", "body {body:?}");
    }
  }
}
