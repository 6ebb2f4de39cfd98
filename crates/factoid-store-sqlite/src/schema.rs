//! SQL schema for the Factoid SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub(crate) const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids from being reused, even for soft-deleted rows.
-- Rows are never removed; DELETE is expressed by stamping deleted_at.
CREATE TABLE IF NOT EXISTS facts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,          -- RFC 3339 UTC; server-assigned
    updated_at  TEXT NOT NULL,          -- RFC 3339 UTC; server-assigned
    deleted_at  TEXT,                   -- NULL while live
    content     TEXT NOT NULL CHECK (content <> ''),
    source      TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS facts_live_idx ON facts(deleted_at);

PRAGMA user_version = 1;
";
