//! [`LocationCascade`]: ordered provider fallback for geocoding and places.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::{
  Coordinate, LocationProvider, PlaceCategory, PlaceMarker, PlaceQuery,
  synthetic::synthetic_markers,
};
use crate::Error;

/// Center used when geocoding fails and nothing was resolved before.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(51.505, -0.09);

// ─── Outcome types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionSource {
  Provider { name: String },
  /// No provider resolved the name; the last known or default center is used.
  Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
  pub coordinate: Coordinate,
  pub label:      String,
  pub source:     ResolutionSource,
}

/// Whether markers came from a live provider. Synthetic data must be shown
/// to the user as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
  Live { provider: String },
  Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSearch {
  pub markers: Vec<PlaceMarker>,
  pub data:    DataSource,
}

impl PlaceSearch {
  pub fn is_synthetic(&self) -> bool { self.data == DataSource::Synthetic }
}

/// Steps of one [`LocationCascade::locate`] request, in the order visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CascadeState {
  NotStarted,
  GeocodingInFlight { provider: String },
  Geocoded { provider: String },
  GeocodeFailed { fallback: Coordinate },
  SearchInFlight { provider: String },
  Results { provider: String, count: usize },
  SearchFailed { provider: String },
  NextProviderOrSynthetic,
  Done,
}

/// Terminal result of [`LocationCascade::locate`]. `markers` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationOutcome {
  pub destination: String,
  pub resolution:  Resolution,
  pub markers:     Vec<PlaceMarker>,
  pub data:        DataSource,
  pub states:      Vec<CascadeState>,
}

impl LocationOutcome {
  pub fn is_synthetic(&self) -> bool { self.data == DataSource::Synthetic }
}

// ─── Cascade ─────────────────────────────────────────────────────────────────

/// Tries providers in priority order. Unconfigured providers are skipped; a
/// configured provider that errors or returns nothing hands over to the next.
pub struct LocationCascade {
  providers:      Vec<Arc<dyn LocationProvider>>,
  default_center: Coordinate,
  last_center:    Mutex<Option<Coordinate>>,
}

impl LocationCascade {
  /// `providers` must be in priority order, highest first.
  pub fn new(providers: Vec<Arc<dyn LocationProvider>>) -> Self {
    Self {
      providers,
      default_center: DEFAULT_CENTER,
      last_center: Mutex::new(None),
    }
  }

  pub fn with_default_center(mut self, center: Coordinate) -> Self {
    self.default_center = center;
    self
  }

  /// Names of configured providers, in priority order.
  pub fn active_providers(&self) -> Vec<&'static str> {
    self
      .providers
      .iter()
      .filter(|p| p.is_configured())
      .map(|p| p.name())
      .collect()
  }

  fn fallback_center(&self) -> Coordinate {
    self
      .last_center
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .unwrap_or(self.default_center)
  }

  fn remember(&self, center: Coordinate) {
    *self.last_center.lock().unwrap_or_else(PoisonError::into_inner) = Some(center);
  }

  /// Geocode `name` through the chain.
  pub async fn resolve_destination(&self, name: &str) -> Resolution {
    self.resolve_traced(name, &mut Vec::new()).await
  }

  /// Search for places near `query.center`. Always returns markers.
  pub async fn search_places(&self, query: &PlaceQuery) -> PlaceSearch {
    self.search_traced(query, &mut Vec::new()).await
  }

  /// Resolve `destination` and search around it in one request.
  pub async fn locate(
    &self,
    destination: &str,
    category: Option<PlaceCategory>,
    radius_m: u32,
  ) -> LocationOutcome {
    let mut states = vec![CascadeState::NotStarted];
    let resolution = self.resolve_traced(destination, &mut states).await;

    let query = PlaceQuery {
      center: resolution.coordinate,
      category,
      radius_m,
      destination: Some(destination.to_owned()),
    };
    let search = self.search_traced(&query, &mut states).await;
    states.push(CascadeState::Done);

    LocationOutcome {
      destination: destination.to_owned(),
      resolution,
      markers: search.markers,
      data: search.data,
      states,
    }
  }

  async fn resolve_traced(&self, name: &str, states: &mut Vec<CascadeState>) -> Resolution {
    let geocoders = self
      .providers
      .iter()
      .filter(|p| p.is_configured() && p.capabilities().geocode);

    for provider in geocoders {
      let tag = provider.name();
      states.push(CascadeState::GeocodingInFlight { provider: tag.to_owned() });
      match provider.geocode(name).await {
        Ok(Some(place)) => {
          tracing::debug!(provider = tag, %name, "destination geocoded");
          states.push(CascadeState::Geocoded { provider: tag.to_owned() });
          self.remember(place.coordinate);
          return Resolution {
            coordinate: place.coordinate,
            label:      place.label,
            source:     ResolutionSource::Provider { name: tag.to_owned() },
          };
        }
        Ok(None) => tracing::debug!(provider = tag, %name, "no geocoding match"),
        Err(e) => tracing::warn!(provider = tag, %name, error = %e, "geocoding failed"),
      }
    }

    let fallback = self.fallback_center();
    tracing::warn!(%name, lat = fallback.lat, lng = fallback.lng, "geocoding exhausted; using fallback center");
    states.push(CascadeState::GeocodeFailed { fallback });
    Resolution {
      coordinate: fallback,
      label:      name.to_owned(),
      source:     ResolutionSource::Fallback,
    }
  }

  async fn search_traced(
    &self,
    query: &PlaceQuery,
    states: &mut Vec<CascadeState>,
  ) -> PlaceSearch {
    let searchers = self
      .providers
      .iter()
      .filter(|p| p.is_configured() && p.capabilities().nearby);

    for provider in searchers {
      let tag = provider.name();
      states.push(CascadeState::SearchInFlight { provider: tag.to_owned() });
      match provider.nearby_search(query).await {
        Ok(markers) if !markers.is_empty() => {
          tracing::debug!(provider = tag, count = markers.len(), "places found");
          states.push(CascadeState::Results { provider: tag.to_owned(), count: markers.len() });
          return PlaceSearch {
            markers,
            data: DataSource::Live { provider: tag.to_owned() },
          };
        }
        Ok(_) => {
          tracing::debug!(provider = tag, "no places returned");
          states.push(CascadeState::Results { provider: tag.to_owned(), count: 0 });
        }
        Err(e) => {
          tracing::warn!(provider = tag, error = %e, "place search failed");
          states.push(CascadeState::SearchFailed { provider: tag.to_owned() });
        }
      }
      states.push(CascadeState::NextProviderOrSynthetic);
    }

    // No provider could search at all.
    if states.last() != Some(&CascadeState::NextProviderOrSynthetic) {
      states.push(CascadeState::NextProviderOrSynthetic);
    }
    tracing::warn!(error = %Error::AllProvidersExhausted, "serving synthetic places");
    let destination = query.destination.as_deref().unwrap_or_default();
    PlaceSearch {
      markers: synthetic_markers(destination, query.center, query.category),
      data:    DataSource::Synthetic,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use async_trait::async_trait;
  use serde_json::Value;

  use super::*;
  use crate::{
    error::ProviderError,
    location::{Capabilities, GeocodedPlace, synthetic::SYNTHETIC_SOURCE},
  };

  enum Behaviour {
    Fail,
    Empty,
    Hit,
  }

  struct Stub {
    name:       &'static str,
    configured: bool,
    behaviour:  Behaviour,
    calls:      AtomicUsize,
  }

  impl Stub {
    fn new(name: &'static str, configured: bool, behaviour: Behaviour) -> Arc<Self> {
      Arc::new(Self { name, configured, behaviour, calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
  }

  #[async_trait]
  impl LocationProvider for Stub {
    fn name(&self) -> &'static str { self.name }

    fn is_configured(&self) -> bool { self.configured }

    fn capabilities(&self) -> Capabilities { Capabilities { geocode: true, nearby: true } }

    async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      match self.behaviour {
        Behaviour::Fail => Err(ProviderError::Http("timeout".into())),
        Behaviour::Empty => Ok(None),
        Behaviour::Hit => Ok(Some(GeocodedPlace {
          coordinate: Coordinate::new(48.8566, 2.3522),
          label:      query.to_owned(),
        })),
      }
    }

    async fn nearby_search(&self, query: &PlaceQuery) -> Result<Vec<PlaceMarker>, ProviderError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      match self.behaviour {
        Behaviour::Fail => Err(ProviderError::Status { status: 503, url: "stub".into() }),
        Behaviour::Empty => Ok(Vec::new()),
        Behaviour::Hit => Ok(vec![PlaceMarker {
          id:         format!("{}-1", self.name),
          title:      "Louvre".into(),
          category:   query.category.unwrap_or(PlaceCategory::Attraction),
          coordinate: query.center,
          rating:     None,
          address:    None,
          source:     self.name.into(),
          payload:    Value::Null,
        }]),
      }
    }
  }

  fn cascade(stubs: &[Arc<Stub>]) -> LocationCascade {
    LocationCascade::new(
      stubs.iter().map(|s| s.clone() as Arc<dyn LocationProvider>).collect(),
    )
  }

  #[tokio::test]
  async fn no_providers_yields_synthetic_markers() {
    let c = LocationCascade::new(Vec::new());
    for destination in ["Paris", "", "Nowhere-on-earth 123"] {
      let resolution = c.resolve_destination(destination).await;
      assert_eq!(resolution.source, ResolutionSource::Fallback);
      let search = c
        .search_places(&PlaceQuery {
          center:      resolution.coordinate,
          category:    None,
          radius_m:    1_000,
          destination: Some(destination.into()),
        })
        .await;
      assert!(!search.markers.is_empty());
      assert!(search.is_synthetic());
      assert!(search.markers.iter().all(|m| m.source == SYNTHETIC_SOURCE));
    }
  }

  #[tokio::test]
  async fn unconfigured_providers_are_never_called() {
    let keyed = Stub::new("keyed", false, Behaviour::Hit);
    let open = Stub::new("open", true, Behaviour::Hit);
    let c = cascade(&[keyed.clone(), open.clone()]);

    let outcome = c.locate("Paris", None, 1_000).await;
    assert_eq!(keyed.calls(), 0);
    assert_eq!(outcome.data, DataSource::Live { provider: "open".into() });
    assert_eq!(c.active_providers(), ["open"]);
  }

  #[tokio::test]
  async fn failure_and_empty_results_fall_through_in_order() {
    let first = Stub::new("first", true, Behaviour::Fail);
    let second = Stub::new("second", true, Behaviour::Empty);
    let third = Stub::new("third", true, Behaviour::Hit);
    let c = cascade(&[first.clone(), second.clone(), third.clone()]);

    let outcome = c.locate("Paris", Some(PlaceCategory::Restaurant), 1_000).await;
    assert_eq!(outcome.data, DataSource::Live { provider: "third".into() });
    assert_eq!(
      outcome.resolution.source,
      ResolutionSource::Provider { name: "third".into() }
    );
    assert_eq!(outcome.markers[0].category, PlaceCategory::Restaurant);
    assert_eq!(outcome.states.first(), Some(&CascadeState::NotStarted));
    assert_eq!(outcome.states.last(), Some(&CascadeState::Done));
    assert!(outcome.states.contains(&CascadeState::SearchFailed { provider: "first".into() }));
    assert!(
      outcome
        .states
        .contains(&CascadeState::Results { provider: "second".into(), count: 0 })
    );
  }

  #[tokio::test]
  async fn first_success_stops_the_chain() {
    let first = Stub::new("first", true, Behaviour::Hit);
    let second = Stub::new("second", true, Behaviour::Hit);
    let c = cascade(&[first.clone(), second.clone()]);

    c.locate("Paris", None, 1_000).await;
    assert_eq!(first.calls(), 2);
    assert_eq!(second.calls(), 0);
  }

  #[tokio::test]
  async fn all_failing_providers_end_in_synthetic_data() {
    let c = cascade(&[
      Stub::new("a", true, Behaviour::Fail),
      Stub::new("b", true, Behaviour::Empty),
    ]);
    let outcome = c.locate("Paris", None, 1_000).await;
    assert!(outcome.is_synthetic());
    assert!(!outcome.markers.is_empty());
    assert_eq!(outcome.resolution.coordinate, DEFAULT_CENTER);
    assert!(matches!(outcome.states[outcome.states.len() - 2], CascadeState::NextProviderOrSynthetic));
  }

  #[tokio::test]
  async fn empty_chain_still_passes_through_the_handover_state() {
    let outcome = LocationCascade::new(Vec::new()).locate("Paris", None, 1_000).await;
    assert!(outcome.is_synthetic());
    assert_eq!(outcome.states, [
      CascadeState::NotStarted,
      CascadeState::GeocodeFailed { fallback: DEFAULT_CENTER },
      CascadeState::NextProviderOrSynthetic,
      CascadeState::Done,
    ]);
  }

  #[tokio::test]
  async fn geocode_failure_reuses_last_known_center() {
    let c = LocationCascade::new(Vec::new()).with_default_center(Coordinate::new(1.0, 2.0));
    assert_eq!(c.resolve_destination("x").await.coordinate, Coordinate::new(1.0, 2.0));

    c.remember(Coordinate::new(35.0, 139.0));
    assert_eq!(c.resolve_destination("y").await.coordinate, Coordinate::new(35.0, 139.0));
  }
}
