//! Server configuration, layered from `config.toml` and `WAYPOINT_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use waypoint_core::location::{Coordinate, DEFAULT_CENTER};
use waypoint_providers::Credentials;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Country the traveller lives in; drives visa/roaming suggestions.
  pub home_country:      String,
  /// Map center used before any destination has been geocoded.
  pub default_lat:       f64,
  pub default_lng:       f64,
  pub rate_ttl_secs:     u64,
  pub http_timeout_secs: u64,
  pub foursquare_key:    Option<String>,
  pub geoapify_key:      Option<String>,
  pub openweather_key:   Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_owned(),
      port:              8080,
      store_path:        PathBuf::from("waypoint.db"),
      home_country:      "United States".to_owned(),
      default_lat:       DEFAULT_CENTER.lat,
      default_lng:       DEFAULT_CENTER.lng,
      rate_ttl_secs:     24 * 60 * 60,
      http_timeout_secs: 10,
      foursquare_key:    None,
      geoapify_key:      None,
      openweather_key:   None,
    }
  }
}

impl ServerConfig {
  /// Read `path` if it exists, then overlay `WAYPOINT_*` variables
  /// (e.g. `WAYPOINT_PORT`, `WAYPOINT_GEOAPIFY_KEY`).
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("WAYPOINT"))
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn default_center(&self) -> Coordinate { Coordinate::new(self.default_lat, self.default_lng) }

  pub fn credentials(&self) -> Credentials {
    Credentials {
      foursquare:     self.foursquare_key.clone(),
      geoapify:       self.geoapify_key.clone(),
      openweathermap: self.openweather_key.clone(),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
