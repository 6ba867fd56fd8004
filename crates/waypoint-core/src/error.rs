//! Error types for `waypoint-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::item::Collection;

#[derive(Debug, Error)]
pub enum Error {
  #[error("trip not found: {0}")]
  TripNotFound(Uuid),

  #[error("{collection} item not found: {id}")]
  ItemNotFound { collection: Collection, id: Uuid },

  #[error("validation failed: {0}")]
  Validation(String),

  /// The durable write failed. The in-memory mutation has already been
  /// applied and is not rolled back.
  #[error("persistence failed: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("every location provider failed or returned nothing")]
  AllProvidersExhausted,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure reported by an external collaborator (weather, places, country
/// data, exchange rates). Callers degrade on it; it never becomes an
/// [`Error`].
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
  #[error("provider credential is not configured")]
  NotConfigured,

  #[error("provider does not support this operation")]
  Unsupported,

  #[error("http error: {0}")]
  Http(String),

  #[error("unexpected status {status} from {url}")]
  Status { status: u16, url: String },

  #[error("could not decode provider response: {0}")]
  Decode(String),

  #[error("no match for {0:?}")]
  NoMatch(String),
}

pub(crate) fn invalid(message: impl Into<String>) -> Error {
  Error::Validation(message.into())
}
