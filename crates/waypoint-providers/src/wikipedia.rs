//! Wikipedia full-text search keyed by destination name. No key.
//!
//! Articles without coordinates are placed at the search center.

use std::collections::HashMap;

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

use crate::http::get_json;

pub const NAME: &str = "wikipedia";

const API_URL: &str = "https://en.wikipedia.org/w/api.php";
const RESULT_LIMIT: u32 = 10;

pub struct Wikipedia {
  client:  Client,
  api_url: String,
}

impl Wikipedia {
  pub fn new(client: Client) -> Self { Self { client, api_url: API_URL.to_owned() } }

  pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
    self.api_url = api_url.into();
    self
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct QueryResponse {
  query: Option<Pages>,
}

#[derive(Debug, Deserialize)]
struct Pages {
  /// Keyed by page id; order is given by `index`.
  #[serde(default)]
  pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
  pageid:      u64,
  title:       String,
  #[serde(default)]
  index:       u32,
  #[serde(default)]
  coordinates: Vec<PageCoordinate>,
  extract:     Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageCoordinate {
  lat: f64,
  lon: f64,
}

// ─── Normalization ───────────────────────────────────────────────────────────

fn search_terms(destination: &str, category: Option<PlaceCategory>) -> String {
  let topic = match category {
    Some(PlaceCategory::Hotel) => "hotels",
    Some(PlaceCategory::Restaurant) => "restaurants",
    Some(PlaceCategory::Activity) => "activities",
    _ => "tourist attractions",
  };
  format!("{destination} {topic}")
}

fn parse_pages(body: QueryResponse, query: &PlaceQuery) -> Vec<PlaceMarker> {
  let mut pages: Vec<Page> = body
    .query
    .map(|q| q.pages.into_values().collect())
    .unwrap_or_default();
  pages.sort_by_key(|p| p.index);

  pages
    .into_iter()
    .map(|p| {
      let coordinate = p
        .coordinates
        .first()
        .map_or(query.center, |c| Coordinate::new(c.lat, c.lon));
      PlaceMarker {
        id: format!("{NAME}-{}", p.pageid),
        category: query.category.unwrap_or(PlaceCategory::Attraction),
        coordinate,
        rating: None,
        address: None,
        source: NAME.to_owned(),
        payload: json!({
          "url": format!("https://en.wikipedia.org/?curid={}", p.pageid),
          "extract": p.extract,
          "approximate": p.coordinates.is_empty(),
        }),
        title: p.title,
      }
    })
    .collect()
}

// ─── Provider ────────────────────────────────────────────────────────────────

#[async_trait]
impl LocationProvider for Wikipedia {
  fn name(&self) -> &'static str { NAME }

  fn capabilities(&self) -> Capabilities { Capabilities { geocode: false, nearby: true } }

  async fn geocode(&self, _query: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
    Err(ProviderError::Unsupported)
  }

  async fn nearby_search(&self, query: &PlaceQuery) -> Result<Vec<PlaceMarker>, ProviderError> {
    let destination = query.destination.as_deref().map(str::trim).unwrap_or_default();
    if destination.is_empty() {
      return Ok(Vec::new());
    }

    let terms = search_terms(destination, query.category);
    let limit = RESULT_LIMIT.to_string();
    let req = self.client.get(&self.api_url).query(&[
      ("action", "query"),
      ("format", "json"),
      ("generator", "search"),
      ("gsrsearch", terms.as_str()),
      ("gsrlimit", limit.as_str()),
      ("prop", "coordinates|extracts"),
      ("exintro", "1"),
      ("explaintext", "1"),
      ("exsentences", "1"),
      ("exlimit", "max"),
    ]);

    let body: QueryResponse = get_json(req).await?;
    Ok(parse_pages(body, query))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn query() -> PlaceQuery {
    PlaceQuery {
      center:      Coordinate::new(48.85, 2.35),
      category:    None,
      radius_m:    5_000,
      destination: Some("Paris".into()),
    }
  }

  #[test]
  fn pages_are_ordered_by_search_rank() {
    let body = serde_json::from_str(
      r#"{"query": {"pages": {
        "100": {"pageid": 100, "title": "Notre-Dame de Paris", "index": 2,
                "coordinates": [{"lat": 48.853, "lon": 2.3498}]},
        "200": {"pageid": 200, "title": "Tourism in Paris", "index": 1,
                "extract": "Paris is a major destination."}
      }}}"#,
    )
    .unwrap();
    let markers = parse_pages(body, &query());

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].title, "Tourism in Paris");
    assert_eq!(markers[0].coordinate, query().center);
    assert_eq!(markers[0].payload["approximate"], true);
    assert_eq!(markers[1].coordinate, Coordinate::new(48.853, 2.3498));
    assert_eq!(markers[1].category, PlaceCategory::Attraction);
  }

  #[test]
  fn no_query_block_means_no_results() {
    let body = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
    assert!(parse_pages(body, &query()).is_empty());
  }

  #[test]
  fn terms_follow_category() {
    assert_eq!(search_terms("Rome", Some(PlaceCategory::Restaurant)), "Rome restaurants");
    assert_eq!(search_terms("Rome", None), "Rome tourist attractions");
  }

  #[tokio::test]
  async fn search_terms_reach_the_api() {
    use axum::{Router, extract::Query, routing::get};

    let handler = |Query(params): Query<HashMap<String, String>>| async move {
      let term = params.get("gsrsearch").cloned().unwrap_or_default();
      axum::Json(json!({ "query": { "pages": {
        "1": { "pageid": 1, "title": term, "index": 1 }
      }}}))
    };
    let base = crate::http::stub_server(Router::new().route("/w/api.php", get(handler))).await;
    let wikipedia = Wikipedia::new(Client::new()).with_api_url(format!("{base}/w/api.php"));

    let markers = wikipedia.nearby_search(&query()).await.unwrap();
    assert_eq!(markers[0].title, "Paris tourist attractions");

    let nameless = PlaceQuery { destination: None, ..query() };
    assert!(wikipedia.nearby_search(&nameless).await.unwrap().is_empty());
  }
}
