//! Monthly plan generation inside one write transaction.

use chrono::Utc;
use fieldplan_core::{
  calendar::working_days_from,
  capacity::{CapacityLedger, SchedulingConfig},
  period::Month,
  planner::{PlanSummary, assign_tasks, build_task_pool},
  registry::{RepStatus, TradePoint},
  visit::{ScheduledVisit, VisitStatus},
};
use rusqlite::Connection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{Result, queries};

/// Replace every scheduled visit dated within `month`, and whatever an earlier
/// plan for `month` spilled into later days, with a fresh plan.
pub fn generate(
  conn: &Connection,
  config: &SchedulingConfig,
  month: Month,
  rep_ids: Option<&[Uuid]>,
) -> Result<PlanSummary> {
  let trade_points: Vec<TradePoint> = queries::select_trade_points(conn)?
    .into_iter()
    .filter(|tp| tp.category.is_some())
    .collect();
  if trade_points.is_empty() {
    return Err(fieldplan_core::Error::NoEligibleTradePoints.into());
  }

  let reps: Vec<Uuid> = queries::select_representatives(conn, Some(RepStatus::Active))?
    .into_iter()
    .map(|r| r.id)
    .filter(|id| rep_ids.is_none_or(|wanted| wanted.contains(id)))
    .collect();
  if reps.is_empty() {
    return Err(fieldplan_core::Error::NoEligibleRepresentatives.into());
  }

  let removed = queries::delete_month_plan(conn, month)?;

  // Spill-over can reach past the month end, where other plans or follow-ups
  // may already hold slots.
  let horizon = working_days_from(month.last_day(), config.plan_lookahead_days)
    .last()
    .unwrap_or(month.last_day());
  let mut ledger = CapacityLedger::new(config.daily_capacity());
  for (rep_id, date, count) in queries::open_loads_between(conn, month.first_day(), horizon)? {
    ledger.add_existing(rep_id, date, count);
  }

  let tasks = build_task_pool(&trade_points, month);
  let outcome = assign_tasks(&tasks, &reps, &mut ledger, config.plan_lookahead_days);

  let now = Utc::now();
  for a in &outcome.assignments {
    let visit = ScheduledVisit {
      id:             Uuid::new_v4(),
      trade_point_id: a.trade_point_id,
      rep_id:         a.rep_id,
      planned_date:   a.date,
      status:         VisitStatus::Planned,
      created_at:     now,
    };
    queries::insert_visit(conn, &visit, Some(month))?;
  }

  for task in &outcome.unassigned {
    warn!(
      month = %month,
      trade_point_id = %task.trade_point_id,
      category = %task.category,
      target_date = %task.target_date,
      lookahead_days = config.plan_lookahead_days,
      "no free slot for plan task; trade point left unassigned this run"
    );
  }

  let summary = PlanSummary::new(month, &outcome, trade_points.len(), reps.len());
  info!(
    month = %month,
    replaced = removed,
    visits = summary.total_visits_planned,
    trade_points = summary.total_trade_points_planned,
    coverage_pct = summary.coverage_pct,
    unassigned = summary.unassigned_tasks,
    "generated monthly plan"
  );
  Ok(summary)
}
