//! JSON REST API for Waypoint.
//!
//! Exposes an axum [`Router`] over an [`AppState`]: the itinerary store plus
//! the derived-view collaborators. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", waypoint_api::router(state))
//! ```

pub mod derived;
pub mod error;
pub mod items;
pub mod trips;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tower_http::trace::TraceLayer;
use waypoint_core::{
  currency::CurrencyConverter,
  documents::CountryLookup,
  item::{Activity, Document, Expense, Review},
  itinerary::ItineraryStore,
  location::LocationCascade,
  store::RecordStore,
  weather::WeatherProvider,
};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<R> {
  pub itinerary:    Arc<ItineraryStore<R>>,
  pub places:       Arc<LocationCascade>,
  pub currency:     Arc<CurrencyConverter>,
  /// `None` generates packing lists without a weather signal.
  pub weather:      Option<Arc<dyn WeatherProvider>>,
  /// `None` yields baseline document checklists only.
  pub countries:    Option<Arc<dyn CountryLookup>>,
  /// Default for `?home_country=` on the documents endpoint.
  pub home_country: String,
}

impl<R> Clone for AppState<R> {
  fn clone(&self) -> Self {
    Self {
      itinerary:    self.itinerary.clone(),
      places:       self.places.clone(),
      currency:     self.currency.clone(),
      weather:      self.weather.clone(),
      countries:    self.countries.clone(),
      home_country: self.home_country.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Mount the item handlers for one nested collection.
fn collection<R, T>(router: Router<AppState<R>>, name: &str) -> Router<AppState<R>>
where
  R: RecordStore + 'static,
  T: waypoint_core::item::TripItem + serde::Serialize,
  T::New: serde::de::DeserializeOwned,
  T::Patch: serde::de::DeserializeOwned,
{
  router
    .route(
      &format!("/trips/{{id}}/{name}"),
      get(items::list::<R, T>).post(items::add::<R, T>),
    )
    .route(
      &format!("/trips/{{id}}/{name}/{{item_id}}"),
      axum::routing::patch(items::update::<R, T>).delete(items::delete::<R, T>),
    )
}

/// Build the API router for `state`.
pub fn router<R>(state: AppState<R>) -> Router
where
  R: RecordStore + 'static,
{
  let router = Router::new()
    // Trips
    .route("/trips", get(trips::list::<R>).post(trips::create::<R>))
    .route(
      "/trips/{id}",
      get(trips::get_one::<R>)
        .patch(trips::update::<R>)
        .delete(trips::delete::<R>),
    )
    .route("/trips/{id}/select", post(trips::select::<R>))
    .route("/selection", get(trips::selection::<R>))
    // Derived views
    .route("/trips/{id}/expenses/summary", get(derived::expense_summary::<R>))
    .route(
      "/trips/{id}/packing-list",
      get(derived::packing_list::<R>).post(derived::attach_packing_list::<R>),
    )
    .route("/trips/{id}/documents/required", get(derived::documents_required::<R>))
    .route("/places", get(derived::places::<R>))
    .route("/convert", get(derived::convert::<R>))
    .route("/rates/{base}", get(derived::rates::<R>));

  // Nested collections
  let router = collection::<R, Activity>(router, "activities");
  let router = collection::<R, Expense>(router, "expenses");
  let router = collection::<R, Document>(router, "documents");
  let router = collection::<R, Review>(router, "reviews");

  router.layer(TraceLayer::new_for_http()).with_state(state)
}
