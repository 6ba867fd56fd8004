//! Foursquare Places (v3) nearby search. Requires an API key.

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

pub const NAME: &str = "foursquare";

const BASE_URL: &str = "https://api.foursquare.com/v3";
const RESULT_LIMIT: u32 = 20;

pub struct Foursquare {
  client:   Client,
  api_key:  Option<String>,
  base_url: String,
}

impl Foursquare {
  pub fn new(client: Client, api_key: Option<String>) -> Self {
    Self { client, api_key: credential(api_key), base_url: BASE_URL.to_owned() }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
  #[serde(default)]
  results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
  fsq_id:     String,
  name:       String,
  geocodes:   Option<Geocodes>,
  location:   Option<Location>,
  /// 0–10 scale.
  rating:     Option<f64>,
  #[serde(default)]
  categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct Geocodes {
  main: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
  latitude:  f64,
  longitude: f64,
}

#[derive(Debug, Deserialize)]
struct Location {
  formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
  name: String,
}

// ─── Normalization ───────────────────────────────────────────────────────────

/// Top-level Foursquare category ids for each place category.
fn category_ids(category: PlaceCategory) -> Option<&'static str> {
  match category {
    PlaceCategory::Hotel => Some("19014"),
    PlaceCategory::Restaurant => Some("13065"),
    PlaceCategory::Attraction => Some("16000"),
    PlaceCategory::Activity => Some("10000"),
    PlaceCategory::Expense | PlaceCategory::Other => None,
  }
}

fn classify(categories: &[Category]) -> PlaceCategory {
  let names = categories
    .iter()
    .map(|c| c.name.to_lowercase())
    .collect::<Vec<_>>()
    .join(" ");
  if names.contains("hotel") || names.contains("hostel") || names.contains("lodging") {
    PlaceCategory::Hotel
  } else if names.contains("restaurant") || names.contains("café") || names.contains("cafe") {
    PlaceCategory::Restaurant
  } else if names.contains("museum") || names.contains("landmark") || names.contains("monument") {
    PlaceCategory::Attraction
  } else if names.is_empty() {
    PlaceCategory::Other
  } else {
    PlaceCategory::Activity
  }
}

fn parse_places(body: SearchResponse, requested: Option<PlaceCategory>) -> Vec<PlaceMarker> {
  body
    .results
    .into_iter()
    .filter_map(|p| {
      let at = p.geocodes?.main?;
      Some(PlaceMarker {
        id:         format!("{NAME}-{}", p.fsq_id),
        category:   requested.unwrap_or_else(|| classify(&p.categories)),
        coordinate: Coordinate::new(at.latitude, at.longitude),
        rating:     p.rating.map(|r| (r / 2.0).clamp(0.0, 5.0)),
        address:    p.location.and_then(|l| l.formatted_address),
        source:     NAME.to_owned(),
        payload:    json!({
          "categories": p.categories.iter().map(|c| &c.name).collect::<Vec<_>>(),
        }),
        title:      p.name,
      })
    })
    .collect()
}

// ─── Provider ────────────────────────────────────────────────────────────────

#[async_trait]
impl LocationProvider for Foursquare {
  fn name(&self) -> &'static str { NAME }

  fn is_configured(&self) -> bool { self.api_key.is_some() }

  fn capabilities(&self) -> Capabilities { Capabilities { geocode: false, nearby: true } }

  async fn geocode(&self, _query: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
    Err(ProviderError::Unsupported)
  }

  async fn nearby_search(&self, query: &PlaceQuery) -> Result<Vec<PlaceMarker>, ProviderError> {
    let key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;

    let mut params = vec![
      ("ll", format!("{},{}", query.center.lat, query.center.lng)),
      ("radius", query.radius_m.to_string()),
      ("limit", RESULT_LIMIT.to_string()),
      ("fields", "fsq_id,name,geocodes,location,rating,categories".to_owned()),
    ];
    if let Some(ids) = query.category.and_then(category_ids) {
      params.push(("categories", ids.to_owned()));
    }

    let req = self
      .client
      .get(format!("{}/places/search", self.base_url))
      .header("Authorization", key)
      .header("Accept", "application/json")
      .query(&params);

    let body: SearchResponse = get_json(req).await?;
    Ok(parse_places(body, query.category))
  }
}
