//! API error type and [`axum::response::IntoResponse`] implementation.

use std::error::Error as StdError;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use fieldplan_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by the scheduling error that caused it, if any.
  pub fn from_store<E>(e: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    let classified = core_cause(&e).map(|core| match core {
      CoreError::InvalidPeriod(_)
      | CoreError::NoEligibleTradePoints
      | CoreError::NoEligibleRepresentatives => Self::BadRequest(core.to_string()),
      CoreError::RepresentativeNotFound(_)
      | CoreError::TradePointNotFound(_)
      | CoreError::VisitNotFound(_) => Self::NotFound(core.to_string()),
      CoreError::InvalidTransition { .. } => Self::Conflict(core.to_string()),
    });
    classified.unwrap_or_else(|| Self::Store(Box::new(e)))
  }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self { Self::from_store(e) }
}

fn core_cause<'a>(e: &'a (dyn StdError + 'static)) -> Option<&'a CoreError> {
  let mut current = Some(e);
  while let Some(err) = current {
    if let Some(core) = err.downcast_ref::<CoreError>() {
      return Some(core);
    }
    current = err.source();
  }
  None
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
