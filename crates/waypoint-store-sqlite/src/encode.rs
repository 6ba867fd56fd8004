//! Conversions between [`Record`] and the plain-text columns of `records`.
//!
//! Timestamps are stored as RFC 3339 strings and values as compact JSON.

use chrono::{DateTime, Utc};
use waypoint_core::store::Record;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// Raw values read directly from a `records` row.
pub struct RawRecord {
  pub name:       String,
  pub value_json: String,
  pub revision:   i64,
  pub updated_at: String,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:       row.get(0)?,
      value_json: row.get(1)?,
      revision:   row.get(2)?,
      updated_at: row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    let revision = u64::try_from(self.revision).map_err(|_| Error::Revision {
      name:     self.name.clone(),
      revision: self.revision,
    })?;
    Ok(Record {
      value: serde_json::from_str(&self.value_json)?,
      updated_at: decode_dt(&self.updated_at)?,
      name: self.name,
      revision,
    })
  }
}
