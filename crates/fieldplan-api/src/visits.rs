//! Handlers for `/visits` (completed-visit history).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use fieldplan_core::{
  store::ScheduleStore,
  visit::{VisitRecord, VisitStats},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, params};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub month:  Option<String>,
  pub rep_id: Option<Uuid>,
}

/// `GET /visits[?month=YYYY-MM][&rep_id=<uuid>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(q): Query<ListParams>,
) -> Result<Json<Vec<VisitRecord>>, ApiError>
where
  S: ScheduleStore,
{
  let month = params::month_or_current(q.month.as_deref())?;
  let records = store
    .list_visit_records(month, q.rep_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
  pub month: Option<String>,
}

/// `GET /visits/stats[?month=YYYY-MM]`
pub async fn stats<S>(
  State(store): State<Arc<S>>,
  Query(q): Query<StatsParams>,
) -> Result<Json<VisitStats>, ApiError>
where
  S: ScheduleStore,
{
  let month = params::month_or_current(q.month.as_deref())?;
  let stats = store.visit_stats(month).await.map_err(ApiError::from_store)?;
  Ok(Json(stats))
}
