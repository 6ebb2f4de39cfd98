//! [`SqliteStore`], the SQLite implementation of [`FactStore`].

use std::{future::Future, path::Path, sync::Arc, time::Instant};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use factoid_core::{
  fact::{Fact, NewFact},
  store::FactStore,
  telemetry::{MetricsSink, NoopMetrics, RequestOutcome, Upstream},
};

use crate::{
  encode::{encode_dt, RawFact, FACT_COLUMNS},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Factoid store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and metrics sink are
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  metrics: Arc<dyn MetricsSink>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  /// Report upstream observations for every store call to `metrics`.
  pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
    self.metrics = metrics;
    self
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, metrics: Arc::new(NoopMetrics) })
  }

  #[cfg(test)]
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection { &self.conn }

  /// Run one store call, recording an upstream request, its latency and its
  /// outcome.
  async fn observe<T>(
    &self,
    op: &'static str,
    call: impl Future<Output = Result<T>>,
  ) -> Result<T> {
    self.metrics.upstream_requests_inc(Upstream::Repo);
    let start = Instant::now();

    let result = call.await;

    let outcome = RequestOutcome::from_result(&result);
    self
      .metrics
      .upstream_request_latency(Upstream::Repo, outcome, start.elapsed());
    self.metrics.upstream_responses_inc(Upstream::Repo, outcome);

    if let Err(e) = &result {
      tracing::debug!(op, error = %e, "store call failed");
    }
    result
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  async fn select_live(&self) -> Result<Vec<Fact>> {
    let raws: Vec<RawFact> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FACT_COLUMNS} FROM facts WHERE deleted_at IS NULL ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawFact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFact::into_fact).collect()
  }

  async fn select_live_one(&self, id: i64) -> Result<Fact> {
    let raw: Option<RawFact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {FACT_COLUMNS} FROM facts WHERE id = ?1 AND deleted_at IS NULL"
              ),
              rusqlite::params![id],
              RawFact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::NotFound)?.into_fact()
  }

  async fn select_live_random(&self) -> Result<Fact> {
    let raw: Option<RawFact> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {FACT_COLUMNS} FROM facts WHERE deleted_at IS NULL
                 ORDER BY RANDOM() LIMIT 1"
              ),
              [],
              RawFact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::NotFound)?.into_fact()
  }

  async fn insert(&self, input: NewFact) -> Result<Fact> {
    let now = Utc::now();
    let (content, source) = input.into_parts();

    let at_str = encode_dt(now);
    let content_col = content.clone();
    let source_col = source.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO facts (created_at, updated_at, content, source)
           VALUES (?1, ?1, ?2, ?3)",
          rusqlite::params![at_str, content_col, source_col],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Fact {
      id,
      created_at: now,
      updated_at: now,
      deleted_at: None,
      content,
      source,
    })
  }

  async fn mark_deleted(&self, id: i64) -> Result<()> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE facts SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
          rusqlite::params![id, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FactStore impl ──────────────────────────────────────────────────────────

impl FactStore for SqliteStore {
  type Error = Error;

  async fn facts(&self) -> Result<Vec<Fact>> {
    self.observe("facts", self.select_live()).await
  }

  async fn fact(&self, id: i64) -> Result<Fact> {
    self.observe("fact", self.select_live_one(id)).await
  }

  async fn random_fact(&self) -> Result<Fact> {
    self.observe("random_fact", self.select_live_random()).await
  }

  async fn create_fact(&self, input: NewFact) -> Result<Fact> {
    self.observe("create_fact", self.insert(input)).await
  }

  async fn delete_fact(&self, id: i64) -> Result<()> {
    self.observe("delete_fact", self.mark_deleted(id)).await
  }
}
