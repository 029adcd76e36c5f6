//! Daily capacity of a representative and the bookkeeping around it.
//!
//! Every component reads the capacity constant from the same
//! [`SchedulingConfig`], so fairness decisions agree across the planner,
//! skip-recovery and redistribution.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{next_working_day, working_days_from};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Tunables of the scheduling engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
  pub work_start_hour:         u32,
  pub work_end_hour:           u32,
  pub lunch_minutes:           u32,
  /// Time spent at one trade point.
  pub visit_minutes:           u32,
  /// Average travel time to reach the next trade point.
  pub travel_minutes:          u32,
  /// Use this value instead of deriving capacity from the working window.
  pub daily_capacity_override: Option<u32>,
  /// Working days the monthly planner scans past a task's target date.
  pub plan_lookahead_days:     u32,
  /// Working days scanned by skip-recovery and disruption redistribution.
  pub recovery_lookahead_days: u32,
}

impl Default for SchedulingConfig {
  fn default() -> Self {
    Self {
      work_start_hour:         9,
      work_end_hour:           18,
      lunch_minutes:           30,
      visit_minutes:           15,
      travel_minutes:          20,
      daily_capacity_override: None,
      plan_lookahead_days:     60,
      recovery_lookahead_days: 30,
    }
  }
}

impl SchedulingConfig {
  /// Maximum visits per representative per day.
  pub fn daily_capacity(&self) -> u32 {
    if let Some(capacity) = self.daily_capacity_override {
      return capacity;
    }
    let window = self.work_end_hour.saturating_sub(self.work_start_hour) * 60;
    let per_visit = (self.visit_minutes + self.travel_minutes).max(1);
    window.saturating_sub(self.lunch_minutes) / per_visit
  }

  /// Rough working time for a day with `visits` stops, in hours (two
  /// decimals).
  pub fn estimated_hours(&self, visits: usize) -> f64 {
    let minutes = visits as f64 * f64::from(self.visit_minutes + self.travel_minutes);
    (minutes / 60.0 * 100.0).round() / 100.0
  }
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// In-memory per-(representative, date) load, seeded once from the store and
/// decremented locally while a plan is built.
#[derive(Debug, Clone)]
pub struct CapacityLedger {
  capacity: u32,
  used:     HashMap<(Uuid, NaiveDate), u32>,
}

impl CapacityLedger {
  pub fn new(capacity: u32) -> Self {
    Self { capacity, used: HashMap::new() }
  }

  pub fn capacity(&self) -> u32 { self.capacity }

  /// Account for `count` visits that already occupy a slot.
  pub fn add_existing(&mut self, rep_id: Uuid, date: NaiveDate, count: u32) {
    *self.used.entry((rep_id, date)).or_default() += count;
  }

  pub fn used(&self, rep_id: Uuid, date: NaiveDate) -> u32 {
    self.used.get(&(rep_id, date)).copied().unwrap_or(0)
  }

  pub fn remaining(&self, rep_id: Uuid, date: NaiveDate) -> u32 {
    self.capacity.saturating_sub(self.used(rep_id, date))
  }

  /// Take one slot. Returns `false` (and changes nothing) when the day is
  /// already full.
  pub fn consume(&mut self, rep_id: Uuid, date: NaiveDate) -> bool {
    if self.remaining(rep_id, date) == 0 {
      return false;
    }
    *self.used.entry((rep_id, date)).or_default() += 1;
    true
  }

  /// The representative with the most remaining capacity on `date`; ties go
  /// to the earliest entry of `reps`. `None` when nobody has room.
  pub fn roomiest(&self, reps: &[Uuid], date: NaiveDate) -> Option<Uuid> {
    let mut best: Option<(Uuid, u32)> = None;
    for &rep in reps {
      let left = self.remaining(rep, date);
      if left > best.map_or(0, |(_, b)| b) {
        best = Some((rep, left));
      }
    }
    best.map(|(rep, _)| rep)
  }
}

// ─── Slot search ─────────────────────────────────────────────────────────────

/// Find the first working day after `after` on which `remaining` reports
/// free capacity, scanning at most `lookahead_days` working days.
///
/// Returns the day and its remaining capacity, or `None` when the window is
/// exhausted.
pub fn next_available_slot<E>(
  after: NaiveDate,
  lookahead_days: u32,
  mut remaining: impl FnMut(NaiveDate) -> Result<u32, E>,
) -> Result<Option<(NaiveDate, u32)>, E> {
  for day in working_days_from(next_working_day(after), lookahead_days) {
    let left = remaining(day)?;
    if left > 0 {
      return Ok(Some((day, left)));
    }
  }
  Ok(None)
}
