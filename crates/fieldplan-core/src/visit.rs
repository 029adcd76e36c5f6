//! Scheduled visits, their status machine, completion records and the read
//! models built on top of them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result, period::Month, policy::Category};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle of one [`ScheduledVisit`] row.
///
/// `Rescheduled` rows are only ever created by the engine as follow-ups; an
/// existing row never moves into that state.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VisitStatus {
  Planned,
  Completed,
  Skipped,
  Rescheduled,
  Cancelled,
}

impl VisitStatus {
  /// Statuses that occupy a slot of the representative's daily capacity.
  pub const OCCUPYING: [VisitStatus; 2] = [Self::Planned, Self::Rescheduled];

  pub fn occupies_slot(self) -> bool { Self::OCCUPYING.contains(&self) }

  /// Whether an existing row in `self` may be moved to `to`.
  ///
  /// `Completed → Completed` is allowed so that completion data can be
  /// corrected; the visit record is then updated in place.
  pub fn can_transition(self, to: VisitStatus) -> bool {
    use VisitStatus::*;
    match (self, to) {
      (Planned | Rescheduled, Completed | Skipped | Cancelled) => true,
      (Completed, Completed) => true,
      _ => false,
    }
  }

  pub fn check_transition(self, to: VisitStatus) -> Result<()> {
    if self.can_transition(to) {
      Ok(())
    } else {
      Err(Error::InvalidTransition { from: self, to })
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One assignment of a trade point to a representative on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledVisit {
  pub id:             Uuid,
  pub trade_point_id: Uuid,
  pub rep_id:         Uuid,
  pub planned_date:   NaiveDate,
  pub status:         VisitStatus,
  pub created_at:     DateTime<Utc>,
}

/// Evidence that a visit actually happened. Created when a scheduled visit
/// is completed; never deleted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
  pub id:             Uuid,
  pub schedule_id:    Option<Uuid>,
  pub trade_point_id: Uuid,
  pub rep_id:         Uuid,
  pub visited_date:   NaiveDate,
  pub time_in:        Option<NaiveTime>,
  pub time_out:       Option<NaiveTime>,
  pub notes:          Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::ScheduleStore::update_visit_status`].
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
  pub status:   VisitStatus,
  pub time_in:  Option<NaiveTime>,
  pub time_out: Option<NaiveTime>,
  pub notes:    Option<String>,
}

impl StatusUpdate {
  pub fn to(status: VisitStatus) -> Self {
    Self { status, time_in: None, time_out: None, notes: None }
  }
}

/// Outcome of a status update, including anything the engine created as a
/// consequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
  pub visit:        ScheduledVisit,
  /// Set when the visit was completed.
  pub visit_record: Option<VisitRecord>,
  /// Set when a skipped visit was rescheduled.
  pub follow_up:    Option<ScheduledVisit>,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A scheduled visit joined with registry names for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedVisitView {
  pub id:               Uuid,
  pub trade_point_id:   Uuid,
  pub trade_point_name: String,
  pub category:         Option<Category>,
  pub rep_id:           Uuid,
  pub rep_name:         String,
  pub planned_date:     NaiveDate,
  pub status:           VisitStatus,
}

/// All visits of one representative on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRoute {
  pub rep_id:                   Uuid,
  pub rep_name:                 String,
  pub date:                     NaiveDate,
  pub visits:                   Vec<PlannedVisitView>,
  pub total:                    usize,
  pub estimated_duration_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyPlan {
  pub month:                      Month,
  pub total_trade_points_planned: usize,
  pub coverage_pct:               f64,
  pub routes:                     Vec<DailyRoute>,
}

/// Completed-visit statistics for one representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepVisitStats {
  pub rep_id:              Uuid,
  pub total_visits:        usize,
  pub unique_trade_points: usize,
}

/// Completed-visit statistics for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitStats {
  pub month:                  Month,
  pub total_visits:           usize,
  pub unique_trade_points:    usize,
  pub unique_representatives: usize,
  /// Keyed by category letter, or `"uncategorized"`.
  pub by_category:            BTreeMap<String, usize>,
  pub by_representative:      Vec<RepVisitStats>,
}
