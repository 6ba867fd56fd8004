//! The `RecordStore` trait: durable storage for named JSON records.
//!
//! The itinerary keeps its whole trip list in one record, rewritten on every
//! mutation. Backends (e.g. `waypoint-store-sqlite`) implement this trait;
//! [`MemoryRecordStore`] is the in-process implementation used for tests and
//! ephemeral sessions.

use std::{collections::HashMap, convert::Infallible, future::Future};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

// ─── Record ──────────────────────────────────────────────────────────────────

/// A named JSON document as last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub name:       String,
  pub value:      serde_json::Value,
  /// Incremented on every write. Informational only: writes are
  /// last-write-wins and never checked against it.
  pub revision:   u64,
  pub updated_at: DateTime<Utc>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable key → JSON store.
///
/// All methods return `Send` futures so the trait can be used behind `axum`
/// handlers on a multi-threaded runtime.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the record named `name`. Returns `None` if it was never written.
  fn load<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + 'a;

  /// Replace the record named `name` wholesale and return what was stored.
  fn save<'a>(
    &'a self,
    name: &'a str,
    value: serde_json::Value,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + 'a;
}

// ─── In-memory implementation ────────────────────────────────────────────────

/// In-memory record store. Never fails.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
  records: RwLock<HashMap<String, Record>>,
}

impl MemoryRecordStore {
  pub fn new() -> Self { Self::default() }
}

impl RecordStore for MemoryRecordStore {
  type Error = Infallible;

  async fn load(&self, name: &str) -> Result<Option<Record>, Infallible> {
    Ok(self.records.read().await.get(name).cloned())
  }

  async fn save(
    &self,
    name: &str,
    value: serde_json::Value,
  ) -> Result<Record, Infallible> {
    let mut records = self.records.write().await;
    let revision = records.get(name).map_or(1, |r| r.revision + 1);
    let record = Record {
      name: name.to_owned(),
      value,
      revision,
      updated_at: Utc::now(),
    };
    records.insert(name.to_owned(), record.clone());
    Ok(record)
  }
}

impl<S: RecordStore> RecordStore for std::sync::Arc<S> {
  type Error = S::Error;

  fn load<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + 'a {
    (**self).load(name)
  }

  fn save<'a>(
    &'a self,
    name: &'a str,
    value: serde_json::Value,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + 'a {
    (**self).save(name, value)
  }
}
