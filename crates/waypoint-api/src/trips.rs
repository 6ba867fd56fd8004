//! Handlers for `/trips` and `/selection`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/trips` | Insertion order |
//! | `POST`   | `/trips` | Body: `NewTrip`; the new trip becomes selected |
//! | `GET`    | `/trips/{id}` | 404 if not found |
//! | `PATCH`  | `/trips/{id}` | Body: `TripPatch` |
//! | `DELETE` | `/trips/{id}` | 204 |
//! | `POST`   | `/trips/{id}/select` | |
//! | `GET`    | `/selection` | 404 if nothing is selected |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use uuid::Uuid;
use waypoint_core::{
  Error,
  store::RecordStore,
  trip::{NewTrip, Trip, TripPatch},
};

use crate::{AppState, error::ApiError};

/// `GET /trips`
pub async fn list<R: RecordStore>(State(state): State<AppState<R>>) -> Json<Vec<Trip>> {
  Json(state.itinerary.trips().await)
}

/// `POST /trips`
pub async fn create<R: RecordStore>(
  State(state): State<AppState<R>>,
  Json(body): Json<NewTrip>,
) -> Result<impl IntoResponse, ApiError> {
  let trip = state.itinerary.create_trip(body).await?;
  Ok((StatusCode::CREATED, Json(trip)))
}

/// `GET /trips/{id}`
pub async fn get_one<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Trip>, ApiError> {
  let trip = state.itinerary.trip(id).await.ok_or(Error::TripNotFound(id))?;
  Ok(Json(trip))
}

/// `PATCH /trips/{id}`
pub async fn update<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<TripPatch>,
) -> Result<Json<Trip>, ApiError> {
  Ok(Json(state.itinerary.update_trip(id, patch).await?))
}

/// `DELETE /trips/{id}`
pub async fn delete<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.itinerary.delete_trip(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /trips/{id}/select`
pub async fn select<R: RecordStore>(
  State(state): State<AppState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Trip>, ApiError> {
  Ok(Json(state.itinerary.select_trip(id).await?))
}

/// `GET /selection`
pub async fn selection<R: RecordStore>(
  State(state): State<AppState<R>>,
) -> Result<Json<Trip>, ApiError> {
  state
    .itinerary
    .selected_trip()
    .await
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("no trip selected".to_owned()))
}
