//! Fact types: the single resource of the Factoid store.
//!
//! A fact is a short piece of free text plus a free-form attribution. Facts
//! are never updated in place; removal is a soft delete that stamps
//! `deleted_at` and hides the row from every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Fact ────────────────────────────────────────────────────────────────────

/// A stored fact. `id` and the timestamps are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
  pub id:         i64,
  pub created_at: DateTime<Utc>,
  /// Set at creation; no operation mutates it afterwards.
  pub updated_at: DateTime<Utc>,
  /// `None` while the fact is live. Never serialised.
  #[serde(skip)]
  pub deleted_at: Option<DateTime<Utc>>,
  pub content:    String,
  pub source:     String,
}

// ─── NewFact ─────────────────────────────────────────────────────────────────

/// Validated input to [`crate::store::FactStore::create_fact`].
///
/// The only way to build one is [`NewFact::new`], so `content` is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFact {
  content: String,
  source:  String,
}

impl NewFact {
  /// Fails with [`Error::BlankContent`] when `content` is empty.
  pub fn new(content: impl Into<String>, source: impl Into<String>) -> Result<Self> {
    let content = content.into();
    if content.is_empty() {
      return Err(Error::BlankContent);
    }
    Ok(Self { content, source: source.into() })
  }

  pub fn content(&self) -> &str { &self.content }

  pub fn source(&self) -> &str { &self.source }

  pub fn into_parts(self) -> (String, String) { (self.content, self.source) }
}
