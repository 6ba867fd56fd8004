//! Waypoint server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, wires the provider clients from whatever credentials are
//! present, and serves the JSON API over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use waypoint_api::AppState;
use waypoint_core::{
  currency::CurrencyConverter,
  documents::CountryLookup,
  itinerary::ItineraryStore,
  location::LocationCascade,
  weather::WeatherProvider,
};
use waypoint_providers::{
  build_client, exchange_rates::OpenExchangeRates, location_chain,
  openweather::OpenWeather, restcountries::RestCountries,
};
use waypoint_store_sqlite::SqliteRecordStore;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Waypoint trip planner API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the listen port.
  #[arg(short, long)]
  port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut server_cfg = ServerConfig::load(&cli.config)?;
  if let Some(port) = cli.port {
    server_cfg.port = port;
  }

  // Open SQLite store and load the itinerary.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteRecordStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let itinerary = ItineraryStore::open(store)
    .await
    .context("failed to load trips")?;

  // Providers.
  let client = build_client(Duration::from_secs(server_cfg.http_timeout_secs))
    .context("failed to build HTTP client")?;
  let credentials = server_cfg.credentials();

  let places = LocationCascade::new(location_chain(&client, &credentials))
    .with_default_center(server_cfg.default_center());
  tracing::info!(providers = ?places.active_providers(), "location cascade ready");

  let weather = OpenWeather::new(client.clone(), credentials.openweathermap.clone());
  let weather: Option<Arc<dyn WeatherProvider>> = if weather.is_configured() {
    Some(Arc::new(weather))
  } else {
    tracing::info!("no OpenWeatherMap key; packing lists ignore weather");
    None
  };

  let currency = CurrencyConverter::new(Arc::new(OpenExchangeRates::new(client.clone())))
    .with_ttl(Duration::from_secs(server_cfg.rate_ttl_secs));
  let countries: Arc<dyn CountryLookup> = Arc::new(RestCountries::new(client));

  // Build application state.
  let state = AppState {
    itinerary:    Arc::new(itinerary),
    places:       Arc::new(places),
    currency:     Arc::new(currency),
    weather,
    countries:    Some(countries),
    home_country: server_cfg.home_country.clone(),
  };

  let app = waypoint_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
