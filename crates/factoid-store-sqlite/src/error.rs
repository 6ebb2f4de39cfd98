//! Error type for `factoid-store-sqlite`.

use factoid_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// No live fact matched the query.
  #[error("not found")]
  NotFound,
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool { matches!(self, Self::NotFound) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
