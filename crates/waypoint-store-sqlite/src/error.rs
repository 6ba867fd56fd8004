//! Error type for `waypoint-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("record {name:?} has invalid revision {revision}")]
  Revision { name: String, revision: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
