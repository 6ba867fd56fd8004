//! Weather signal consumed by the packing generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Current conditions at a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
  /// Degrees Celsius.
  pub temperature_c: f64,
  /// Free-text condition, e.g. "light rain" or "Clear".
  pub condition:     String,
  /// Relative humidity in percent.
  pub humidity:      Option<f64>,
  /// Metres per second.
  pub wind_speed:    Option<f64>,
}

impl WeatherSnapshot {
  pub fn new(temperature_c: f64, condition: impl Into<String>) -> Self {
    Self {
      temperature_c,
      condition: condition.into(),
      humidity: None,
      wind_speed: None,
    }
  }

  /// Case-insensitive substring match on the condition text.
  pub fn condition_mentions(&self, needle: &str) -> bool {
    self.condition.to_lowercase().contains(needle)
  }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
  async fn current_weather(&self, place: &str) -> Result<WeatherSnapshot, ProviderError>;
}
