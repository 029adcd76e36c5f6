//! Read models assembled from the visit tables.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use fieldplan_core::{
  capacity::SchedulingConfig,
  period::Month,
  planner::coverage_pct,
  visit::{
    DailyRoute, MonthlyPlan, PlannedVisitView, RepVisitStats, VisitStats,
    VisitStatus,
  },
};
use rusqlite::Connection;
use uuid::Uuid;

use crate::{Result, queries};

/// Statuses that count a trade point as covered.
const COVERING: [VisitStatus; 3] =
  [VisitStatus::Planned, VisitStatus::Rescheduled, VisitStatus::Completed];

/// Group views, already ordered by representative and date, into routes.
fn group_routes(config: &SchedulingConfig, views: Vec<PlannedVisitView>) -> Vec<DailyRoute> {
  let mut routes: Vec<DailyRoute> = Vec::new();
  for view in views {
    match routes.last_mut() {
      Some(route) if route.rep_id == view.rep_id && route.date == view.planned_date => {
        route.visits.push(view);
      }
      _ => routes.push(DailyRoute {
        rep_id:                   view.rep_id,
        rep_name:                 view.rep_name.clone(),
        date:                     view.planned_date,
        visits:                   vec![view],
        total:                    0,
        estimated_duration_hours: 0.0,
      }),
    }
  }
  for route in &mut routes {
    route.total = route.visits.len();
    route.estimated_duration_hours = config.estimated_hours(route.total);
  }
  routes
}

pub fn monthly_plan(
  conn: &Connection,
  config: &SchedulingConfig,
  month: Month,
  rep_id: Option<Uuid>,
) -> Result<MonthlyPlan> {
  let views = queries::select_visit_views(conn, month.first_day(), month.last_day(), rep_id)?;

  let covered: HashSet<Uuid> = views
    .iter()
    .filter(|v| COVERING.contains(&v.status))
    .map(|v| v.trade_point_id)
    .collect();
  let eligible = queries::select_trade_points(conn)?
    .iter()
    .filter(|tp| tp.category.is_some())
    .count();

  Ok(MonthlyPlan {
    month,
    total_trade_points_planned: covered.len(),
    coverage_pct: coverage_pct(covered.len(), eligible),
    routes: group_routes(config, views),
  })
}

pub fn daily_plan(
  conn: &Connection,
  config: &SchedulingConfig,
  date: NaiveDate,
) -> Result<Vec<DailyRoute>> {
  let views = queries::select_visit_views(conn, date, date, None)?;
  Ok(group_routes(config, views))
}

pub fn visit_stats(conn: &Connection, month: Month) -> Result<VisitStats> {
  let records = queries::select_records(conn, month.first_day(), month.last_day(), None)?;
  let categories: HashMap<Uuid, String> = queries::select_trade_points(conn)?
    .into_iter()
    .map(|tp| {
      let key = tp.category.map_or_else(|| "uncategorized".to_owned(), |c| c.to_string());
      (tp.id, key)
    })
    .collect();

  let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
  let mut per_rep: Vec<(Uuid, usize, HashSet<Uuid>)> = Vec::new();
  for record in &records {
    let key = categories
      .get(&record.trade_point_id)
      .cloned()
      .unwrap_or_else(|| "uncategorized".to_owned());
    *by_category.entry(key).or_default() += 1;

    match per_rep.iter_mut().find(|(id, ..)| *id == record.rep_id) {
      Some((_, total, tps)) => {
        *total += 1;
        tps.insert(record.trade_point_id);
      }
      None => per_rep.push((record.rep_id, 1, HashSet::from([record.trade_point_id]))),
    }
  }

  let unique_trade_points: HashSet<Uuid> = records.iter().map(|r| r.trade_point_id).collect();
  Ok(VisitStats {
    month,
    total_visits: records.len(),
    unique_trade_points: unique_trade_points.len(),
    unique_representatives: per_rep.len(),
    by_category,
    by_representative: per_rep
      .into_iter()
      .map(|(rep_id, total_visits, tps)| RepVisitStats {
        rep_id,
        total_visits,
        unique_trade_points: tps.len(),
      })
      .collect(),
  })
}
