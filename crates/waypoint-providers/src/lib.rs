//! HTTP clients for Waypoint's external collaborators.
//!
//! Each module normalizes one service's JSON into the core types and
//! implements the matching `waypoint-core` trait. Providers that need a key
//! report themselves unconfigured when it is missing and are skipped.

mod http;

pub mod exchange_rates;
pub mod foursquare;
pub mod geoapify;
pub mod openweather;
pub mod osm;
pub mod restcountries;
pub mod wikipedia;

use std::sync::Arc;

pub use http::{DEFAULT_TIMEOUT, build_client};
use reqwest::Client;
use waypoint_core::location::LocationProvider;

/// API keys for the keyed providers. `None` or blank disables a provider.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
  pub foursquare:     Option<String>,
  pub geoapify:       Option<String>,
  pub openweathermap: Option<String>,
}

impl Credentials {
  /// Whether at least one key is set.
  pub fn any(&self) -> bool {
    [&self.foursquare, &self.geoapify, &self.openweathermap]
      .into_iter()
      .any(|key| http::credential(key.clone()).is_some())
  }
}

/// The location chain in priority order: Foursquare, Geoapify,
/// OpenStreetMap, Wikipedia.
///
/// With no credentials at all the chain is empty and every lookup is served
/// by the synthetic fallback. The open tiers are only used alongside a
/// configured deployment.
pub fn location_chain(client: &Client, credentials: &Credentials) -> Vec<Arc<dyn LocationProvider>> {
  if !credentials.any() {
    tracing::info!("no provider credentials; places will be synthetic");
    return Vec::new();
  }
  let chain: [Arc<dyn LocationProvider>; 4] = [
    Arc::new(foursquare::Foursquare::new(client.clone(), credentials.foursquare.clone())),
    Arc::new(geoapify::Geoapify::new(client.clone(), credentials.geoapify.clone())),
    Arc::new(osm::OpenStreetMap::new(client.clone())),
    Arc::new(wikipedia::Wikipedia::new(client.clone())),
  ];
  chain.into()
}

#[cfg(test)]
mod tests {
  use waypoint_core::location::{LocationCascade, PlaceQuery, ResolutionSource};

  use super::*;

  #[test]
  fn chain_order_and_configuration() {
    let chain = location_chain(&Client::new(), &Credentials {
      geoapify: Some("key".into()),
      ..Default::default()
    });
    let names: Vec<_> = chain.iter().map(|p| p.name()).collect();
    assert_eq!(names, ["foursquare", "geoapify", "openstreetmap", "wikipedia"]);

    let configured: Vec<_> = chain
      .iter()
      .filter(|p| p.is_configured())
      .map(|p| p.name())
      .collect();
    assert_eq!(configured, ["geoapify", "openstreetmap", "wikipedia"]);
  }

  #[test]
  fn blank_keys_are_no_credentials() {
    let credentials = Credentials { foursquare: Some("  ".into()), ..Default::default() };
    assert!(!credentials.any());
    assert!(location_chain(&Client::new(), &credentials).is_empty());
  }

  #[tokio::test]
  async fn no_credentials_yield_synthetic_places() {
    let cascade = LocationCascade::new(location_chain(&Client::new(), &Credentials::default()));
    assert!(cascade.active_providers().is_empty());

    let resolution = cascade.resolve_destination("Atlantis").await;
    assert_eq!(resolution.source, ResolutionSource::Fallback);

    let search = cascade
      .search_places(&PlaceQuery {
        center:      resolution.coordinate,
        category:    None,
        radius_m:    1_000,
        destination: Some("Atlantis".into()),
      })
      .await;
    assert!(search.is_synthetic());
    assert!(!search.markers.is_empty());
  }
}
