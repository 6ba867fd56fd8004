//! REST Countries name lookup. No key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use waypoint_core::{
  documents::{CountryInfo, CountryLookup, Dialling},
  error::ProviderError,
};

use crate::http::{endpoint, get_json};

const BASE_URL: &str = "https://restcountries.com/v3.1";

pub struct RestCountries {
  client:   Client,
  base_url: String,
}

impl RestCountries {
  pub fn new(client: Client) -> Self { Self { client, base_url: BASE_URL.to_owned() } }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }
}

#[derive(Debug, Deserialize)]
struct Country {
  name: Name,
  idd:  Option<Idd>,
}

#[derive(Debug, Deserialize)]
struct Name {
  common:   String,
  official: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Idd {
  root:     Option<String>,
  #[serde(default)]
  suffixes: Vec<String>,
}

/// Pick the best match for `query`: an exact common or official name if
/// present, else the first result.
fn best_match(countries: Vec<Country>, query: &str) -> Result<CountryInfo, ProviderError> {
  let query = query.trim();
  let exact = countries.iter().position(|c| {
    c.name.common.eq_ignore_ascii_case(query)
      || c.name.official.as_deref().is_some_and(|o| o.eq_ignore_ascii_case(query))
  });
  let country = countries
    .into_iter()
    .nth(exact.unwrap_or(0))
    .ok_or_else(|| ProviderError::NoMatch(query.to_owned()))?;

  let dialling = country.idd.and_then(|idd| {
    let root = idd.root.filter(|r| !r.is_empty())?;
    Some(Dialling { root, suffixes: idd.suffixes })
  });
  Ok(CountryInfo { canonical_name: country.name.common, dialling })
}

#[async_trait]
impl CountryLookup for RestCountries {
  async fn lookup_country(&self, name: &str) -> Result<CountryInfo, ProviderError> {
    let url = endpoint(&self.base_url, &["name", name.trim()])?;
    let req = self.client.get(url).query(&[("fields", "name,idd")]);

    // An unknown name comes back as 404.
    let countries: Vec<Country> = match get_json(req).await {
      Err(ProviderError::Status { status: 404, .. }) => Vec::new(),
      other => other?,
    };
    best_match(countries, name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"[
    {"name": {"common": "Guinea", "official": "Republic of Guinea"},
     "idd": {"root": "+2", "suffixes": ["24"]}},
    {"name": {"common": "Papua New Guinea", "official": "Independent State of Papua New Guinea"},
     "idd": {"root": "+6", "suffixes": ["75"]}}
  ]"#;

  fn sample() -> Vec<Country> { serde_json::from_str(SAMPLE).unwrap() }

  #[test]
  fn exact_name_beats_first_result() {
    let info = best_match(sample(), "papua new guinea").unwrap();
    assert_eq!(info.canonical_name, "Papua New Guinea");
    assert_eq!(
      info.dialling,
      Some(Dialling { root: "+6".into(), suffixes: vec!["75".into()] })
    );
  }

  #[test]
  fn falls_back_to_first_result() {
    assert_eq!(best_match(sample(), "guin").unwrap().canonical_name, "Guinea");
  }

  #[test]
  fn empty_root_means_no_dialling() {
    let countries = serde_json::from_str(
      r#"[{"name": {"common": "Antarctica"}, "idd": {"root": "", "suffixes": []}}]"#,
    )
    .unwrap();
    assert_eq!(best_match(countries, "Antarctica").unwrap().dialling, None);
  }

  #[test]
  fn no_results_is_no_match() {
    assert!(matches!(best_match(Vec::new(), "Atlantis"), Err(ProviderError::NoMatch(_))));
  }

  /// Answers 404 for "Atlantis" and echoes any other name back as a country.
  async fn countries_stub() -> RestCountries {
    use axum::{Json, Router, extract::Path, http::StatusCode, response::IntoResponse, routing::get};

    let handler = |Path(name): Path<String>| async move {
      if name == "Atlantis" {
        return StatusCode::NOT_FOUND.into_response();
      }
      Json(serde_json::json!([{ "name": { "common": name }, "idd": { "root": "+9" } }]))
        .into_response()
    };
    let base = crate::http::stub_server(Router::new().route("/name/{name}", get(handler))).await;
    RestCountries::new(Client::new()).with_base_url(base)
  }

  #[tokio::test]
  async fn unknown_country_is_no_match() {
    let countries = countries_stub().await;
    assert!(matches!(
      countries.lookup_country("Atlantis").await,
      Err(ProviderError::NoMatch(name)) if name == "Atlantis"
    ));
  }

  #[tokio::test]
  async fn country_name_travels_as_one_path_segment() {
    let countries = countries_stub().await;
    let info = countries.lookup_country(" Bosnia/Herzegovina?x#y ").await.unwrap();
    assert_eq!(info.canonical_name, "Bosnia/Herzegovina?x#y");
    assert_eq!(info.dialling, Some(Dialling { root: "+9".into(), suffixes: Vec::new() }));
  }
}
