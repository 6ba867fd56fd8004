//! SQL schema for the Waypoint SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per named record; each write replaces the value wholesale.
CREATE TABLE IF NOT EXISTS records (
    name        TEXT PRIMARY KEY,
    value_json  TEXT NOT NULL,
    revision    INTEGER NOT NULL,   -- bumped per write, never checked
    updated_at  TEXT NOT NULL       -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
