//! The `FactStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `factoid-store-sqlite`).
//! Higher layers (`factoid-api`, `factoid-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::fact::{Fact, NewFact};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Bound on a backend's error type.
///
/// Backends translate their own "no matching row" condition into an error
/// for which [`StoreError::is_not_found`] returns `true`. Every other failure
/// is opaque to callers.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_not_found(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Factoid storage backend.
///
/// Every read path only ever sees live facts; soft-deleted rows are
/// invisible. Dropping a returned future abandons the call.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FactStore: Send + Sync {
  type Error: StoreError;

  /// All live facts, ordered by ascending id.
  fn facts(&self) -> impl Future<Output = Result<Vec<Fact>, Self::Error>> + Send + '_;

  /// The live fact with `id`, or a not-found error.
  fn fact(&self, id: i64) -> impl Future<Output = Result<Fact, Self::Error>> + Send + '_;

  /// One live fact chosen uniformly at random, or a not-found error when no
  /// live fact exists.
  fn random_fact(&self) -> impl Future<Output = Result<Fact, Self::Error>> + Send + '_;

  /// Persist a new live fact. `id`, `created_at` and `updated_at` are set by
  /// the store.
  fn create_fact(
    &self,
    input: NewFact,
  ) -> impl Future<Output = Result<Fact, Self::Error>> + Send + '_;

  /// Soft-delete the fact with `id`.
  ///
  /// Does not report whether a row was affected; callers that need to know
  /// whether the fact existed must call [`FactStore::fact`] first.
  fn delete_fact(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
