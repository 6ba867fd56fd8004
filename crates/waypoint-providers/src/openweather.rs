//! OpenWeatherMap current conditions. Requires an API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use waypoint_core::{
  error::ProviderError,
  weather::{WeatherProvider, WeatherSnapshot},
};

use crate::http::{credential, get_json};

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeather {
  client:   Client,
  api_key:  Option<String>,
  base_url: String,
}

impl OpenWeather {
  pub fn new(client: Client, api_key: Option<String>) -> Self {
    Self { client, api_key: credential(api_key), base_url: BASE_URL.to_owned() }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  pub fn is_configured(&self) -> bool { self.api_key.is_some() }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
  main:    Main,
  #[serde(default)]
  weather: Vec<Condition>,
  wind:    Option<Wind>,
}

#[derive(Debug, Deserialize)]
struct Main {
  temp:     f64,
  humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Condition {
  main:        String,
  description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Wind {
  speed: Option<f64>,
}

/// Metric units are requested, so `temp` is already Celsius.
fn into_snapshot(body: CurrentWeather) -> WeatherSnapshot {
  let condition = body
    .weather
    .into_iter()
    .next()
    .map(|c| c.description.filter(|d| !d.is_empty()).unwrap_or(c.main))
    .unwrap_or_default();
  WeatherSnapshot {
    temperature_c: body.main.temp,
    condition,
    humidity: body.main.humidity,
    wind_speed: body.wind.and_then(|w| w.speed),
  }
}

#[async_trait]
impl WeatherProvider for OpenWeather {
  async fn current_weather(&self, place: &str) -> Result<WeatherSnapshot, ProviderError> {
    let key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
    let req = self
      .client
      .get(format!("{}/weather", self.base_url))
      .query(&[("q", place), ("units", "metric"), ("appid", key)]);

    let body: CurrentWeather = get_json(req).await?;
    let snapshot = into_snapshot(body);
    tracing::debug!(%place, temperature = snapshot.temperature_c, condition = %snapshot.condition, "weather fetched");
    Ok(snapshot)
  }
}
