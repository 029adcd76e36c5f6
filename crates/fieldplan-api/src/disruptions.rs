//! Handlers for `/disruptions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/disruptions` | Body: `{"rep_id":..., "event_date":"2026-02-10", "kind":"illness"}` |
//! | `GET`  | `/disruptions` | `?month=YYYY-MM`, ordered by event date |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use fieldplan_core::{
  disruption::{DisruptionEvent, NewDisruption},
  store::ScheduleStore,
};
use serde::Deserialize;

use crate::{error::ApiError, params};

/// `POST /disruptions`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewDisruption>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  let event = store
    .record_disruption(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(event)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub month: Option<String>,
}

/// `GET /disruptions[?month=YYYY-MM]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(q): Query<ListParams>,
) -> Result<Json<Vec<DisruptionEvent>>, ApiError>
where
  S: ScheduleStore,
{
  let month = params::month_or_current(q.month.as_deref())?;
  let events = store
    .list_disruptions(month)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(events))
}
