//! OpenStreetMap: Nominatim for geocoding, Overpass for nearby places. No key.

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

pub const NAME: &str = "openstreetmap";

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const RESULT_LIMIT: u32 = 25;

pub struct OpenStreetMap {
  client:        Client,
  nominatim_url: String,
  overpass_url:  String,
}

impl OpenStreetMap {
  pub fn new(client: Client) -> Self {
    Self {
      client,
      nominatim_url: NOMINATIM_URL.to_owned(),
      overpass_url: OVERPASS_URL.to_owned(),
    }
  }

  pub fn with_urls(mut self, nominatim: impl Into<String>, overpass: impl Into<String>) -> Self {
    self.nominatim_url = nominatim.into();
    self.overpass_url = overpass.into();
    self
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
  lat:          String,
  lon:          String,
  display_name: String,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
  #[serde(default)]
  elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
  #[serde(rename = "type")]
  kind:   String,
  id:     u64,
  lat:    Option<f64>,
  lon:    Option<f64>,
  /// Present on ways and relations with `out center`.
  center: Option<Center>,
  #[serde(default)]
  tags:   HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Center {
  lat: f64,
  lon: f64,
}

// ─── Normalization ───────────────────────────────────────────────────────────

fn parse_geocode(hits: Vec<NominatimHit>) -> Result<Option<GeocodedPlace>, ProviderError> {
  let Some(hit) = hits.into_iter().next() else {
    return Ok(None);
  };
  let parse = |s: &str| {
    s.parse::<f64>()
      .map_err(|e| ProviderError::Decode(format!("bad coordinate {s:?}: {e}")))
  };
  Ok(Some(GeocodedPlace {
    coordinate: Coordinate::new(parse(&hit.lat)?, parse(&hit.lon)?),
    label:      hit.display_name,
  }))
}

/// Overpass QL selectors for a category.
fn selectors(category: Option<PlaceCategory>) -> &'static [&'static str] {
  match category {
    Some(PlaceCategory::Hotel) => &[r#"["tourism"~"hotel|hostel|guest_house"]"#],
    Some(PlaceCategory::Restaurant) => &[r#"["amenity"~"restaurant|cafe"]"#],
    Some(PlaceCategory::Attraction) => &[r#"["tourism"~"attraction|museum|viewpoint"]"#],
    Some(PlaceCategory::Activity) => &[r#"["leisure"~"park|sports_centre"]"#],
    _ => &[
      r#"["tourism"~"attraction|museum|viewpoint"]"#,
      r#"["amenity"~"restaurant|cafe"]"#,
      r#"["tourism"~"hotel|hostel|guest_house"]"#,
    ],
  }
}

fn overpass_query(query: &PlaceQuery) -> String {
  let around = format!(
    "(around:{},{},{})",
    query.radius_m, query.center.lat, query.center.lng
  );
  let body: String = selectors(query.category)
    .iter()
    .map(|s| format!(r#"nwr{s}["name"]{around};"#))
    .collect();
  format!("[out:json][timeout:25];({body});out center {RESULT_LIMIT};")
}

fn classify(tags: &HashMap<String, String>) -> PlaceCategory {
  match (tags.get("tourism").map(String::as_str), tags.get("amenity").map(String::as_str)) {
    (Some("hotel" | "hostel" | "guest_house"), _) => PlaceCategory::Hotel,
    (Some(_), _) => PlaceCategory::Attraction,
    (_, Some("restaurant" | "cafe")) => PlaceCategory::Restaurant,
    _ if tags.contains_key("leisure") => PlaceCategory::Activity,
    _ => PlaceCategory::Other,
  }
}

fn address(tags: &HashMap<String, String>) -> Option<String> {
  let street = tags.get("addr:street")?;
  Some(match tags.get("addr:housenumber") {
    Some(number) => format!("{number} {street}"),
    None => street.clone(),
  })
}

fn parse_places(body: OverpassResponse, requested: Option<PlaceCategory>) -> Vec<PlaceMarker> {
  body
    .elements
    .into_iter()
    .filter_map(|e| {
      let coordinate = match (e.lat, e.lon, &e.center) {
        (Some(lat), Some(lon), _) => Coordinate::new(lat, lon),
        (_, _, Some(c)) => Coordinate::new(c.lat, c.lon),
        _ => return None,
      };
      let title = e.tags.get("name")?.clone();
      Some(PlaceMarker {
        id: format!("{NAME}-{}-{}", e.kind, e.id),
        title,
        category: requested.unwrap_or_else(|| classify(&e.tags)),
        coordinate,
        rating: None,
        address: address(&e.tags),
        source: NAME.to_owned(),
        payload: json!({ "tags": e.tags }),
      })
    })
    .collect()
}

// ─── Provider ────────────────────────────────────────────────────────────────

#[async_trait]
impl LocationProvider for OpenStreetMap {
  fn name(&self) -> &'static str { NAME }

  fn capabilities(&self) -> Capabilities { Capabilities { geocode: true, nearby: true } }

  async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
    let req = self
      .client
      .get(format!("{}/search", self.nominatim_url))
      .query(&[("q", query), ("format", "json"), ("limit", "1")]);

    parse_geocode(get_json(req).await?)
  }

  async fn nearby_search(&self, query: &PlaceQuery) -> Result<Vec<PlaceMarker>, ProviderError> {
    let req = self
      .client
      .get(&self.overpass_url)
      .query(&[("data", overpass_query(query))]);

    let body: OverpassResponse = get_json(req).await?;
    Ok(parse_places(body, query.category))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nominatim_string_coordinates_are_parsed() {
    let hits = serde_json::from_str(
      r#"[{"lat": "48.8534951", "lon": "2.3483915", "display_name": "Paris, Île-de-France, France"}]"#,
    )
    .unwrap();
    let place = parse_geocode(hits).unwrap().unwrap();
    assert_eq!(place.coordinate, Coordinate::new(48.8534951, 2.3483915));
    assert_eq!(place.label, "Paris, Île-de-France, France");
  }

  #[test]
  fn nominatim_garbage_coordinate_is_a_decode_error() {
    let hits = vec![NominatimHit {
      lat:          "north".into(),
      lon:          "2.0".into(),
      display_name: "x".into(),
    }];
    assert!(matches!(parse_geocode(hits), Err(ProviderError::Decode(_))));
  }

  #[test]
  fn overpass_elements_are_normalized() {
    let body = serde_json::from_str(
      r#"{"elements": [
        {"type": "node", "id": 1, "lat": 48.86, "lon": 2.33,
         "tags": {"name": "Le Procope", "amenity": "restaurant",
                  "addr:street": "Rue de l'Ancienne Comédie", "addr:housenumber": "13"}},
        {"type": "way", "id": 2, "center": {"lat": 48.85, "lon": 2.29},
         "tags": {"name": "Tour Eiffel", "tourism": "attraction"}},
        {"type": "node", "id": 3, "lat": 48.0, "lon": 2.0, "tags": {}}
      ]}"#,
    )
    .unwrap();
    let markers = parse_places(body, None);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].category, PlaceCategory::Restaurant);
    assert_eq!(markers[0].address.as_deref(), Some("13 Rue de l'Ancienne Comédie"));
    assert_eq!(markers[1].id, "openstreetmap-way-2");
    assert_eq!(markers[1].category, PlaceCategory::Attraction);
    assert_eq!(markers[1].coordinate, Coordinate::new(48.85, 2.29));
  }

  #[test]
  fn query_mentions_radius_and_center() {
    let q = overpass_query(&PlaceQuery {
      center:      Coordinate::new(1.5, 2.5),
      category:    Some(PlaceCategory::Hotel),
      radius_m:    800,
      destination: None,
    });
    assert!(q.contains("(around:800,1.5,2.5)"));
    assert!(q.contains("hotel"));
    assert!(q.starts_with("[out:json]"));
  }

  #[tokio::test]
  async fn nominatim_and_overpass_are_separate_services() {
    use axum::{Router, extract::Query, routing::get};

    let nominatim = |Query(params): Query<HashMap<String, String>>| async move {
      if params.get("q").map(String::as_str) == Some("Paris") {
        r#"[{"lat": "48.85", "lon": "2.35", "display_name": "Paris, France"}]"#
      } else {
        "[]"
      }
    };
    let overpass = || async {
      r#"{"elements": [{"type": "node", "id": 7, "lat": 48.86, "lon": 2.33,
                        "tags": {"name": "Café de Flore", "amenity": "cafe"}}]}"#
    };
    let base = crate::http::stub_server(
      Router::new()
        .route("/search", get(nominatim))
        .route("/interpreter", get(overpass)),
    )
    .await;
    let osm = OpenStreetMap::new(Client::new()).with_urls(&base, format!("{base}/interpreter"));

    let place = osm.geocode("Paris").await.unwrap().unwrap();
    assert_eq!(place.coordinate, Coordinate::new(48.85, 2.35));
    assert!(osm.geocode("Atlantis").await.unwrap().is_none());

    let markers = osm
      .nearby_search(&PlaceQuery {
        center:      place.coordinate,
        category:    Some(PlaceCategory::Restaurant),
        radius_m:    500,
        destination: None,
      })
      .await
      .unwrap();
    assert_eq!(markers[0].id, "openstreetmap-node-7");
  }
}
