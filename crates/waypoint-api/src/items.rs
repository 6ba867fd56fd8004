//! Handlers for a trip's nested collections, generic over the item type.
//!
//! Mounted once per collection (`activities`, `expenses`, `documents`,
//! `reviews`):
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/trips/{id}/{collection}` | Insertion order; expenses newest first |
//! | `POST`   | `/trips/{id}/{collection}` | 201 |
//! | `PATCH`  | `/trips/{id}/{collection}/{item_id}` | |
//! | `DELETE` | `/trips/{id}/{collection}/{item_id}` | 204 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;
use waypoint_core::{item::TripItem, store::RecordStore};

use crate::{AppState, error::ApiError};

/// `GET /trips/{id}/{collection}`
pub async fn list<R, T>(
  State(state): State<AppState<R>>,
  Path(trip_id): Path<Uuid>,
) -> Result<Json<Vec<T>>, ApiError>
where
  R: RecordStore,
  T: TripItem + Serialize,
{
  Ok(Json(state.itinerary.items::<T>(trip_id).await?))
}

/// `POST /trips/{id}/{collection}`
pub async fn add<R, T>(
  State(state): State<AppState<R>>,
  Path(trip_id): Path<Uuid>,
  Json(body): Json<T::New>,
) -> Result<impl IntoResponse, ApiError>
where
  R: RecordStore,
  T: TripItem + Serialize,
  T::New: DeserializeOwned,
{
  let item = state.itinerary.add_item::<T>(trip_id, body).await?;
  Ok((StatusCode::CREATED, Json(item)))
}

/// `PATCH /trips/{id}/{collection}/{item_id}`
pub async fn update<R, T>(
  State(state): State<AppState<R>>,
  Path((trip_id, item_id)): Path<(Uuid, Uuid)>,
  Json(patch): Json<T::Patch>,
) -> Result<Json<T>, ApiError>
where
  R: RecordStore,
  T: TripItem + Serialize,
  T::Patch: DeserializeOwned,
{
  Ok(Json(state.itinerary.update_item::<T>(trip_id, item_id, patch).await?))
}

/// `DELETE /trips/{id}/{collection}/{item_id}`
pub async fn delete<R, T>(
  State(state): State<AppState<R>>,
  Path((trip_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  R: RecordStore,
  T: TripItem,
{
  state.itinerary.delete_item::<T>(trip_id, item_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
