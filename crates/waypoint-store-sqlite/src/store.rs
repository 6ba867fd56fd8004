//! [`SqliteRecordStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use waypoint_core::store::{Record, RecordStore};

use crate::{
  encode::{RawRecord, encode_dt},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Named JSON records backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteRecordStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRecordStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a fresh in-memory store. Nothing survives the connection.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Names of every stored record, sorted.
  pub async fn record_names(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM records ORDER BY name")?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await?;
    Ok(names)
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteRecordStore {
  type Error = crate::Error;

  async fn load(&self, name: &str) -> Result<Option<Record>> {
    let name = name.to_owned();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT name, value_json, revision, updated_at FROM records WHERE name = ?1",
            rusqlite::params![name],
            RawRecord::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn save(&self, name: &str, value: serde_json::Value) -> Result<Record> {
    let name = name.to_owned();
    let json = serde_json::to_string(&value)?;
    let at_str = encode_dt(Utc::now());

    // The upsert bumps the revision atomically; RETURNING hands back the row
    // as stored.
    let raw: RawRecord = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO records (name, value_json, revision, updated_at)
           VALUES (?1, ?2, 1, ?3)
           ON CONFLICT (name) DO UPDATE SET
             value_json = excluded.value_json,
             revision   = records.revision + 1,
             updated_at = excluded.updated_at
           RETURNING name, value_json, revision, updated_at",
          rusqlite::params![name, json, at_str],
          RawRecord::from_row,
        )?)
      })
      .await?;

    let record = raw.into_record()?;
    tracing::debug!(name = %record.name, revision = record.revision, "record saved");
    Ok(record)
  }
}
