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
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Engine(#[from] rota_core::Error),

  #[error("snapshot source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use rota_core::Error as Engine;

    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Engine(e) => match e {
        Engine::InvalidWeekId(_) | Engine::InvalidShiftTime(_) => {
          (StatusCode::BAD_REQUEST, e.to_string())
        }
        Engine::ShiftNotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        Engine::InvalidOperation(_) => (StatusCode::CONFLICT, e.to_string()),
        Engine::RemoteWriteFailure(_) => {
          (StatusCode::BAD_GATEWAY, e.to_string())
        }
        Engine::Serialization(_) => {
          (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
      },
      ApiError::Source(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
