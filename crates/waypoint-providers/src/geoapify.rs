//! Geoapify geocoding and Places API. Requires an API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use waypoint_core::{
  error::ProviderError,
  location::{
    Capabilities, Coordinate, GeocodedPlace, LocationProvider, PlaceCategory,
    PlaceMarker, PlaceQuery,
  },
};

use crate::http::{credential, get_json};

pub const NAME: &str = "geoapify";

const BASE_URL: &str = "https://api.geoapify.com";
const RESULT_LIMIT: u32 = 20;

pub struct Geoapify {
  client:   Client,
  api_key:  Option<String>,
  base_url: String,
}

impl Geoapify {
  pub fn new(client: Client, api_key: Option<String>) -> Self {
    Self { client, api_key: credential(api_key), base_url: BASE_URL.to_owned() }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  fn key(&self) -> Result<&str, ProviderError> {
    self.api_key.as_deref().ok_or(ProviderError::NotConfigured)
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

/// Both endpoints answer with a GeoJSON feature collection.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
  #[serde(default)]
  features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
  properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
  lat:        f64,
  lon:        f64,
  name:       Option<String>,
  formatted:  Option<String>,
  place_id:   Option<String>,
  #[serde(default)]
  categories: Vec<String>,
}

// ─── Normalization ───────────────────────────────────────────────────────────

fn category_filter(category: Option<PlaceCategory>) -> &'static str {
  match category {
    Some(PlaceCategory::Hotel) => "accommodation",
    Some(PlaceCategory::Restaurant) => "catering",
    Some(PlaceCategory::Attraction) => "tourism",
    Some(PlaceCategory::Activity) => "entertainment,leisure",
    _ => "tourism,catering,accommodation,entertainment",
  }
}

fn classify(categories: &[String]) -> PlaceCategory {
  let has = |prefix: &str| categories.iter().any(|c| c.starts_with(prefix));
  if has("accommodation") {
    PlaceCategory::Hotel
  } else if has("catering") {
    PlaceCategory::Restaurant
  } else if has("tourism") {
    PlaceCategory::Attraction
  } else if has("entertainment") || has("leisure") {
    PlaceCategory::Activity
  } else {
    PlaceCategory::Other
  }
}

fn parse_geocode(body: FeatureCollection, query: &str) -> Option<GeocodedPlace> {
  body.features.into_iter().next().map(|f| GeocodedPlace {
    coordinate: Coordinate::new(f.properties.lat, f.properties.lon),
    label:      f.properties.formatted.unwrap_or_else(|| query.to_owned()),
  })
}

fn parse_places(body: FeatureCollection, requested: Option<PlaceCategory>) -> Vec<PlaceMarker> {
  body
    .features
    .into_iter()
    .enumerate()
    .filter_map(|(i, f)| {
      let p = f.properties;
      let title = p.name?;
      Some(PlaceMarker {
        id: format!("{NAME}-{}", p.place_id.unwrap_or_else(|| i.to_string())),
        title,
        category: requested.unwrap_or_else(|| classify(&p.categories)),
        coordinate: Coordinate::new(p.lat, p.lon),
        rating: None,
        address: p.formatted,
        source: NAME.to_owned(),
        payload: json!({ "categories": p.categories }),
      })
    })
    .collect()
}

// ─── Provider ────────────────────────────────────────────────────────────────

#[async_trait]
impl LocationProvider for Geoapify {
  fn name(&self) -> &'static str { NAME }

  fn is_configured(&self) -> bool { self.api_key.is_some() }

  fn capabilities(&self) -> Capabilities { Capabilities { geocode: true, nearby: true } }

  async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
    let req = self
      .client
      .get(format!("{}/v1/geocode/search", self.base_url))
      .query(&[("text", query), ("limit", "1"), ("apiKey", self.key()?)]);

    let body: FeatureCollection = get_json(req).await?;
    Ok(parse_geocode(body, query))
  }

  async fn nearby_search(&self, query: &PlaceQuery) -> Result<Vec<PlaceMarker>, ProviderError> {
    let filter = format!(
      "circle:{},{},{}",
      query.center.lng, query.center.lat, query.radius_m
    );
    let bias = format!("proximity:{},{}", query.center.lng, query.center.lat);
    let limit = RESULT_LIMIT.to_string();

    let req = self
      .client
      .get(format!("{}/v2/places", self.base_url))
      .query(&[
        ("categories", category_filter(query.category)),
        ("filter", filter.as_str()),
        ("bias", bias.as_str()),
        ("limit", limit.as_str()),
        ("apiKey", self.key()?),
      ]);

    let body: FeatureCollection = get_json(req).await?;
    Ok(parse_places(body, query.category))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const GEOCODE: &str = r#"{
    "type": "FeatureCollection",
    "features": [
      { "type": "Feature",
        "properties": { "lat": 48.8588897, "lon": 2.320041, "formatted": "Paris, France" } }
    ]
  }"#;

  const PLACES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
      { "type": "Feature",
        "properties": {
          "name": "Hôtel Regina", "lat": 48.8638, "lon": 2.3320,
          "formatted": "2 Place des Pyramides, Paris",
          "place_id": "51abc", "categories": ["accommodation", "accommodation.hotel"] } },
      { "type": "Feature",
        "properties": { "lat": 48.86, "lon": 2.33, "categories": ["tourism"] } }
    ]
  }"#;

  #[test]
  fn geocode_takes_first_feature() {
    let place = parse_geocode(serde_json::from_str(GEOCODE).unwrap(), "paris").unwrap();
    assert_eq!(place.label, "Paris, France");
    assert_eq!(place.coordinate, Coordinate::new(48.8588897, 2.320041));
  }

  #[test]
  fn empty_geocode_is_none() {
    let body = serde_json::from_str(r#"{"features": []}"#).unwrap();
    assert_eq!(parse_geocode(body, "nowhere"), None);
  }

  #[test]
  fn places_skip_unnamed_features() {
    let markers = parse_places(serde_json::from_str(PLACES).unwrap(), None);
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].id, "geoapify-51abc");
    assert_eq!(markers[0].category, PlaceCategory::Hotel);
    assert_eq!(markers[0].address.as_deref(), Some("2 Place des Pyramides, Paris"));
  }

  #[test]
  fn category_filters() {
    assert_eq!(category_filter(Some(PlaceCategory::Restaurant)), "catering");
    assert!(category_filter(None).contains("tourism"));
  }

  #[tokio::test]
  async fn geocode_and_search_hit_their_endpoints() {
    use std::collections::HashMap;

    use axum::{Router, extract::Query, http::StatusCode, response::IntoResponse, routing::get};

    let keyed = |body: &'static str| {
      move |Query(params): Query<HashMap<String, String>>| async move {
        match params.get("apiKey").map(String::as_str) {
          Some("key") => body.into_response(),
          _ => StatusCode::UNAUTHORIZED.into_response(),
        }
      }
    };
    let base = crate::http::stub_server(
      Router::new()
        .route("/v1/geocode/search", get(keyed(GEOCODE)))
        .route("/v2/places", get(keyed(PLACES))),
    )
    .await;
    let geoapify = Geoapify::new(Client::new(), Some("key".into())).with_base_url(base);

    let place = geoapify.geocode("Paris").await.unwrap().unwrap();
    assert_eq!(place.label, "Paris, France");

    let markers = geoapify
      .nearby_search(&PlaceQuery {
        center:      place.coordinate,
        category:    None,
        radius_m:    1_000,
        destination: None,
      })
      .await
      .unwrap();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].category, PlaceCategory::Hotel);
  }
}
