//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("internal error: {0}")]
  Internal(#[source] waypoint_core::Error),
}

impl From<waypoint_core::Error> for ApiError {
  fn from(e: waypoint_core::Error) -> Self {
    use waypoint_core::Error as E;
    match e {
      E::TripNotFound(_) | E::ItemNotFound { .. } => ApiError::NotFound(e.to_string()),
      E::Validation(_) => ApiError::BadRequest(e.to_string()),
      other => ApiError::Internal(other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
