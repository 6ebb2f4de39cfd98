//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use factoid_core::fact::Fact;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawFact::from_row`]; shared by every read query.
pub const FACT_COLUMNS: &str =
  "id, created_at, updated_at, deleted_at, content, source";

/// Raw values read directly from a `facts` row.
pub struct RawFact {
  pub id:         i64,
  pub created_at: String,
  pub updated_at: String,
  pub deleted_at: Option<String>,
  pub content:    String,
  pub source:     String,
}

impl RawFact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      created_at: row.get(1)?,
      updated_at: row.get(2)?,
      deleted_at: row.get(3)?,
      content:    row.get(4)?,
      source:     row.get(5)?,
    })
  }

  pub fn into_fact(self) -> Result<Fact> {
    Ok(Fact {
      id:         self.id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      deleted_at: self.deleted_at.as_deref().map(decode_dt).transpose()?,
      content:    self.content,
      source:     self.source,
    })
  }
}
