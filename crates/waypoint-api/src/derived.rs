//! Handlers for views derived from a trip or from provider data.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/trips/{id}/expenses/summary` | Optional `?currency=` adds a converted total |
//! | `GET`  | `/trips/{id}/packing-list` | Generated; weather-adjusted when available |
//! | `POST` | `/trips/{id}/packing-list` | Body: list or `null`; attaches to the trip |
//! | `GET`  | `/trips/{id}/documents/required` | Optional `?home_country=` |
//! | `GET`  | `/places` | `?destination=&category=&radius=` |
//! | `GET`  | `/convert` | `?amount=&from=&to=` |
//! | `GET`  | `/rates/{base}` | Rate table and its freshness |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use waypoint_core::{
  Error,
  currency::RateTable,
  documents::required_documents,
  item::Document,
  ledger::ExpenseSummary,
  location::{DEFAULT_RADIUS_M, LocationOutcome, PlaceCategory},
  packing::{PackingCategory, carry_over_packed, generate_packing_list, packing_list_with_weather},
  store::RecordStore,
  trip::Trip,
};

use crate::{AppState, error::ApiError};

async fn find_trip<R: RecordStore>(state: &AppState<R>, id: Uuid) -> Result<Trip, ApiError> {
  Ok(state.itinerary.trip(id).await.ok_or(Error::TripNotFound(id))?)
}

// ─── Expenses ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
  pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertedTotal {
  pub currency: String,
  pub total:    f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
  #[serde(flatten)]
  pub summary:   ExpenseSummary,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub converted: Option<ConvertedTotal>,
}

/// `GET /trips/{id}/expenses/summary[?currency=<code>]`
pub async fn expense_summary<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(id): Path<Uuid>,
  Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
  let expenses = state.itinerary.expenses(id).await?;
  let summary = ExpenseSummary::from_expenses(&expenses);

  let converted = match params.currency.as_deref().map(str::trim) {
    Some(code) if !code.is_empty() => {
      let currency = code.to_ascii_uppercase();
      let total = state.currency.total_in(&expenses, &currency).await;
      Some(ConvertedTotal { currency, total })
    }
    _ => None,
  };

  Ok(Json(SummaryResponse { summary, converted }))
}

// ─── Packing list ────────────────────────────────────────────────────────────

/// `GET /trips/{id}/packing-list`
///
/// Items already marked packed on the trip's attached list stay packed.
pub async fn packing_list<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<PackingCategory>>, ApiError> {
  let trip = find_trip(&state, id).await?;
  let fresh = match state.weather.as_deref() {
    Some(weather) => packing_list_with_weather(&trip, weather).await,
    None => generate_packing_list(&trip, None),
  };
  let list = match &trip.packing_list {
    Some(previous) => carry_over_packed(previous, fresh),
    None => fresh,
  };
  Ok(Json(list))
}

/// `POST /trips/{id}/packing-list`, body: a list, or `null` to detach.
pub async fn attach_packing_list<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(id): Path<Uuid>,
  Json(list): Json<Option<Vec<PackingCategory>>>,
) -> Result<Json<Trip>, ApiError> {
  Ok(Json(state.itinerary.attach_packing_list(id, list).await?))
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DocumentParams {
  pub home_country: Option<String>,
}

/// `GET /trips/{id}/documents/required[?home_country=<name>]`
pub async fn documents_required<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(id): Path<Uuid>,
  Query(params): Query<DocumentParams>,
) -> Result<Json<Vec<Document>>, ApiError> {
  let trip = find_trip(&state, id).await?;
  let home = params.home_country.as_deref().unwrap_or(&state.home_country);
  Ok(Json(required_documents(&trip, home, state.countries.as_deref()).await))
}

// ─── Places ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlacesParams {
  pub destination: String,
  pub category:    Option<PlaceCategory>,
  /// Metres.
  pub radius:      Option<u32>,
}

/// `GET /places?destination=<name>[&category=<c>][&radius=<m>]`
pub async fn places<R: RecordStore>(
  State(state): State<AppState<R>>,
  Query(params): Query<PlacesParams>,
) -> Json<LocationOutcome> {
  let radius = params.radius.unwrap_or(DEFAULT_RADIUS_M);
  Json(state.places.locate(&params.destination, params.category, radius).await)
}

// ─── Currency ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
  pub amount: f64,
  pub from:   String,
  pub to:     String,
}

#[derive(Debug, Serialize)]
pub struct Conversion {
  pub amount: f64,
  pub from:   String,
  pub to:     String,
  pub result: f64,
}

/// `GET /convert?amount=<n>&from=<code>&to=<code>`
pub async fn convert<R: RecordStore>(
  State(state): State<AppState<R>>,
  Query(params): Query<ConvertParams>,
) -> Result<Json<Conversion>, ApiError> {
  if !params.amount.is_finite() {
    return Err(ApiError::BadRequest("amount must be a finite number".to_owned()));
  }
  let result = state.currency.convert(params.amount, &params.from, &params.to).await;
  Ok(Json(Conversion {
    amount: params.amount,
    from: params.from.trim().to_ascii_uppercase(),
    to: params.to.trim().to_ascii_uppercase(),
    result,
  }))
}

/// `GET /rates/{base}`
pub async fn rates<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(base): Path<String>,
) -> Json<RateTable> {
  Json(state.currency.rates(&base).await)
}
