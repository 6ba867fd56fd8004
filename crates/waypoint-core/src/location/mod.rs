//! Map data: geocoding and nearby places from a prioritized provider chain.
//!
//! Providers implement [`LocationProvider`]; the [`LocationCascade`] tries
//! them in order and falls back to [`synthetic`] markers so callers always
//! get something to draw, flagged as such.

mod cascade;
pub mod synthetic;

pub use cascade::{
  CascadeState, DEFAULT_CENTER, DataSource, LocationCascade, LocationOutcome,
  PlaceSearch, Resolution, ResolutionSource,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ProviderError;

// ─── Geometry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
  pub lat: f64,
  pub lng: f64,
}

impl Coordinate {
  pub const fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }
}

/// A geocoding hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
  pub coordinate: Coordinate,
  pub label:      String,
}

// ─── Markers ─────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlaceCategory {
  Activity,
  Hotel,
  Restaurant,
  Attraction,
  Expense,
  Other,
}

/// A normalized point of interest, whatever provider produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMarker {
  pub id:         String,
  pub title:      String,
  pub category:   PlaceCategory,
  pub coordinate: Coordinate,
  pub rating:     Option<f64>,
  pub address:    Option<String>,
  /// Provider tag, e.g. `"foursquare"` or `"synthetic"`.
  pub source:     String,
  /// Provider-specific details passed through for display.
  #[serde(default)]
  pub payload:    serde_json::Value,
}

/// Parameters for a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceQuery {
  pub center:      Coordinate,
  /// `None` searches every category.
  pub category:    Option<PlaceCategory>,
  pub radius_m:    u32,
  /// Destination name, for providers that search by text.
  pub destination: Option<String>,
}

/// Default search radius in metres.
pub const DEFAULT_RADIUS_M: u32 = 5_000;

// ─── Provider capability ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
  pub geocode: bool,
  pub nearby:  bool,
}

/// One tier of the location cascade.
#[async_trait]
pub trait LocationProvider: Send + Sync {
  /// Short tag recorded on markers and in logs.
  fn name(&self) -> &'static str;

  /// Whether the provider's credential (if any) is present. Unconfigured
  /// providers are skipped without being called.
  fn is_configured(&self) -> bool { true }

  fn capabilities(&self) -> Capabilities;

  async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, ProviderError>;

  async fn nearby_search(&self, query: &PlaceQuery) -> Result<Vec<PlaceMarker>, ProviderError>;
}
