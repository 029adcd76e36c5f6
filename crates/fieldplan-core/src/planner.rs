//! Monthly plan construction: task pool and first-fit assignment.
//!
//! Nothing here touches storage. The store loads trade points,
//! representatives and existing load, runs [`assign_tasks`] against a
//! [`CapacityLedger`], and persists the resulting assignments.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  calendar::{week_groups, working_days, working_days_from},
  capacity::CapacityLedger,
  period::Month,
  policy::{Category, visit_dates},
  registry::TradePoint,
};

/// One visit the month needs, before it is given to anybody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTask {
  pub trade_point_id: Uuid,
  pub category:       Category,
  pub target_date:    NaiveDate,
}

/// A task placed on a representative's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
  pub trade_point_id: Uuid,
  pub rep_id:         Uuid,
  pub date:           NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
  pub assignments: Vec<Assignment>,
  /// Tasks for which the forward search found no free slot.
  pub unassigned:  Vec<PlanTask>,
}

/// Aggregate result of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
  pub month:                      Month,
  pub total_visits_planned:       usize,
  pub total_trade_points_planned: usize,
  pub total_trade_points:         usize,
  pub coverage_pct:               f64,
  pub representative_count:       usize,
  pub unassigned_tasks:           usize,
}

impl PlanSummary {
  pub fn new(
    month: Month,
    outcome: &PlanOutcome,
    total_trade_points: usize,
    representative_count: usize,
  ) -> Self {
    let covered: HashSet<Uuid> =
      outcome.assignments.iter().map(|a| a.trade_point_id).collect();
    Self {
      month,
      total_visits_planned: outcome.assignments.len(),
      total_trade_points_planned: covered.len(),
      total_trade_points,
      coverage_pct: coverage_pct(covered.len(), total_trade_points),
      representative_count,
      unassigned_tasks: outcome.unassigned.len(),
    }
  }
}

/// `100 * covered / total`, rounded to one decimal; `0.0` for an empty base.
pub fn coverage_pct(covered: usize, total: usize) -> f64 {
  if total == 0 {
    return 0.0;
  }
  (covered as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Every (trade point, target date) the month calls for, ordered by date and
/// then category priority. Uncategorised trade points are skipped.
pub fn build_task_pool(trade_points: &[TradePoint], month: Month) -> Vec<PlanTask> {
  let days = working_days(month);
  let weeks = week_groups(&days);

  let mut tasks: Vec<PlanTask> = trade_points
    .iter()
    .filter_map(|tp| tp.category.map(|c| (tp.id, c)))
    .flat_map(|(trade_point_id, category)| {
      visit_dates(
        category,
        &weeks,
        &days,
        month.quarter_start_month(),
        month.month(),
      )
      .into_iter()
      .map(move |target_date| PlanTask { trade_point_id, category, target_date })
    })
    .collect();

  tasks.sort_by_key(|t| (t.target_date, t.category.priority()));
  tasks
}

/// Give each task to the representative with the most remaining capacity on
/// the first working day, from its target date on, where anyone has room.
///
/// The search covers `lookahead_days` working days; tasks that find nothing
/// are returned in [`PlanOutcome::unassigned`] instead of failing the run.
pub fn assign_tasks(
  tasks: &[PlanTask],
  reps: &[Uuid],
  ledger: &mut CapacityLedger,
  lookahead_days: u32,
) -> PlanOutcome {
  let mut outcome = PlanOutcome::default();

  for task in tasks {
    let placed = working_days_from(task.target_date, lookahead_days).find_map(|day| {
      let rep_id = ledger.roomiest(reps, day)?;
      ledger.consume(rep_id, day).then_some(Assignment {
        trade_point_id: task.trade_point_id,
        rep_id,
        date: day,
      })
    });

    match placed {
      Some(assignment) => outcome.assignments.push(assignment),
      None => outcome.unassigned.push(*task),
    }
  }

  outcome
}
