//! open.er-api.com latest rates. No key.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use waypoint_core::{currency::RateProvider, error::ProviderError};

use crate::http::{endpoint, get_json};

const BASE_URL: &str = "https://open.er-api.com/v6";

pub struct OpenExchangeRates {
  client:   Client,
  base_url: String,
}

impl OpenExchangeRates {
  pub fn new(client: Client) -> Self { Self { client, base_url: BASE_URL.to_owned() } }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }
}

#[derive(Debug, Deserialize)]
struct LatestRates {
  result:     String,
  #[serde(rename = "error-type")]
  error_type: Option<String>,
  #[serde(default)]
  rates:      HashMap<String, f64>,
}

fn into_rates(body: LatestRates, base: &str) -> Result<HashMap<String, f64>, ProviderError> {
  if body.result != "success" {
    let reason = body.error_type.unwrap_or(body.result);
    return Err(match reason.as_str() {
      "unsupported-code" => ProviderError::NoMatch(base.to_owned()),
      _ => ProviderError::Decode(reason),
    });
  }
  Ok(body.rates)
}

#[async_trait]
impl RateProvider for OpenExchangeRates {
  async fn rates(&self, base: &str) -> Result<HashMap<String, f64>, ProviderError> {
    let url = endpoint(&self.base_url, &["latest", base])?;
    into_rates(get_json(self.client.get(url)).await?, base)
  }
}
