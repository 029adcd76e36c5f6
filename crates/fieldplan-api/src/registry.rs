//! Handlers for the trade-point and representative registries.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use fieldplan_core::{
  Error as CoreError,
  registry::{NewRepresentative, NewTradePoint, RepStatus, Representative, TradePoint},
  store::ScheduleStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

fn require_name(name: &str) -> Result<(), ApiError> {
  if name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  Ok(())
}

// ─── Trade points ────────────────────────────────────────────────────────────

/// `GET /trade-points`
pub async fn list_trade_points<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<TradePoint>>, ApiError>
where
  S: ScheduleStore,
{
  let tps = store.list_trade_points().await.map_err(ApiError::from_store)?;
  Ok(Json(tps))
}

/// `POST /trade-points` — body: `{"name":"...", "category":"A"}`
pub async fn create_trade_point<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewTradePoint>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  require_name(&body.name)?;
  let tp = store
    .add_trade_point(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(tp)))
}

/// `GET /trade-points/{id}`
pub async fn get_trade_point<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TradePoint>, ApiError>
where
  S: ScheduleStore,
{
  let tp = store
    .get_trade_point(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(CoreError::TradePointNotFound(id))?;
  Ok(Json(tp))
}

// ─── Representatives ─────────────────────────────────────────────────────────

/// `GET /representatives`
pub async fn list_representatives<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Representative>>, ApiError>
where
  S: ScheduleStore,
{
  let reps = store
    .list_representatives()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(reps))
}

/// `POST /representatives` — body: `{"name":"...", "status":"active"}`
pub async fn create_representative<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewRepresentative>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  require_name(&body.name)?;
  let rep = store
    .add_representative(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(rep)))
}

/// `GET /representatives/{id}`
pub async fn get_representative<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Representative>, ApiError>
where
  S: ScheduleStore,
{
  let rep = store
    .get_representative(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(CoreError::RepresentativeNotFound(id))?;
  Ok(Json(rep))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: RepStatus,
}

/// `PATCH /representatives/{id}/status` — body: `{"status":"vacation"}`
pub async fn set_status<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Representative>, ApiError>
where
  S: ScheduleStore,
{
  let rep = store
    .set_representative_status(id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rep))
}
