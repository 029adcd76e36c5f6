//! Handlers for `/schedule` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/schedule/generate` | Body: `{"month":"2026-02","rep_ids":[...]}`, both optional |
//! | `GET`   | `/schedule` | `?month=YYYY-MM&rep_id=<uuid>` |
//! | `GET`   | `/schedule/daily` | `?date=YYYY-MM-DD` |
//! | `GET`   | `/schedule/visits/{id}` | 404 if not found |
//! | `PATCH` | `/schedule/visits/{id}/status` | Body: `{"status":"skipped"}` plus optional times and notes |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use fieldplan_core::{
  Error as CoreError,
  store::ScheduleStore,
  visit::{DailyRoute, MonthlyPlan, ScheduledVisit, StatusChange, StatusUpdate},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, params};

// ─── Generate ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct GenerateBody {
  pub month:   Option<String>,
  pub rep_ids: Option<Vec<Uuid>>,
}

/// `POST /schedule/generate`
pub async fn generate<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<GenerateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  let month = params::month_or_current(body.month.as_deref())?;
  let summary = store
    .generate_monthly_plan(month, body.rep_ids)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(summary)))
}

// ─── Monthly / daily plan ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
  pub month:  Option<String>,
  pub rep_id: Option<Uuid>,
}

/// `GET /schedule[?month=YYYY-MM][&rep_id=<uuid>]`
pub async fn monthly<S>(
  State(store): State<Arc<S>>,
  Query(q): Query<MonthlyParams>,
) -> Result<Json<MonthlyPlan>, ApiError>
where
  S: ScheduleStore,
{
  let month = params::month_or_current(q.month.as_deref())?;
  let plan = store
    .get_monthly_plan(month, q.rep_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(plan))
}

#[derive(Debug, Deserialize)]
pub struct DailyParams {
  pub date: String,
}

/// `GET /schedule/daily?date=YYYY-MM-DD`
pub async fn daily<S>(
  State(store): State<Arc<S>>,
  Query(q): Query<DailyParams>,
) -> Result<Json<Vec<DailyRoute>>, ApiError>
where
  S: ScheduleStore,
{
  let date = params::date(&q.date)?;
  let routes = store
    .get_daily_plan(date)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(routes))
}

// ─── Single visit ────────────────────────────────────────────────────────────

/// `GET /schedule/visits/{id}`
pub async fn get_visit<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ScheduledVisit>, ApiError>
where
  S: ScheduleStore,
{
  let visit = store
    .get_visit(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(CoreError::VisitNotFound(id))?;
  Ok(Json(visit))
}

/// `PATCH /schedule/visits/{id}/status`
pub async fn update_status<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusUpdate>,
) -> Result<Json<StatusChange>, ApiError>
where
  S: ScheduleStore,
{
  let change = store
    .update_visit_status(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(change))
}
