//! Visit status changes, including skip recovery.

use chrono::{NaiveDate, Utc};
use fieldplan_core::{
  capacity::{SchedulingConfig, next_available_slot},
  registry::RepStatus,
  visit::{ScheduledVisit, StatusChange, StatusUpdate, VisitRecord, VisitStatus},
};
use rusqlite::Connection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{Result, queries};

/// Move a visit to `update.status` and run whatever that status triggers.
pub fn apply_status(
  conn: &Connection,
  config: &SchedulingConfig,
  visit_id: Uuid,
  update: StatusUpdate,
) -> Result<StatusChange> {
  let mut visit = queries::select_visit(conn, visit_id)?
    .ok_or(fieldplan_core::Error::VisitNotFound(visit_id))?;
  visit.status.check_transition(update.status)?;

  queries::update_visit_status(conn, visit.id, update.status)?;
  visit.status = update.status;

  let mut change = StatusChange { visit, visit_record: None, follow_up: None };
  match update.status {
    VisitStatus::Completed => {
      change.visit_record = Some(record_completion(conn, &change.visit, update)?);
    }
    VisitStatus::Skipped => {
      change.follow_up = reschedule_skipped(conn, config, &change.visit)?;
    }
    _ => {}
  }
  Ok(change)
}

/// Create the visit record for a completed visit, or overwrite the supplied
/// fields of the one already linked to it.
fn record_completion(
  conn: &Connection,
  visit: &ScheduledVisit,
  update: StatusUpdate,
) -> Result<VisitRecord> {
  let record = match queries::select_record_by_schedule(conn, visit.id)? {
    Some(existing) => VisitRecord {
      time_in: update.time_in.or(existing.time_in),
      time_out: update.time_out.or(existing.time_out),
      notes: update.notes.or(existing.notes),
      ..existing
    },
    None => VisitRecord {
      id:             Uuid::new_v4(),
      schedule_id:    Some(visit.id),
      trade_point_id: visit.trade_point_id,
      rep_id:         visit.rep_id,
      visited_date:   visit.planned_date,
      time_in:        update.time_in,
      time_out:       update.time_out,
      notes:          update.notes,
      created_at:     Utc::now(),
    },
  };
  queries::upsert_record(conn, &record)?;
  Ok(record)
}

/// Find the first free slot after the skipped date, trying the same
/// representative first (while still active) and then every other active
/// representative in registry order.
fn reschedule_skipped(
  conn: &Connection,
  config: &SchedulingConfig,
  skipped: &ScheduledVisit,
) -> Result<Option<ScheduledVisit>> {
  let active = queries::select_representatives(conn, Some(RepStatus::Active))?;
  let candidates = active
    .iter()
    .filter(|r| r.id == skipped.rep_id)
    .chain(active.iter().filter(|r| r.id != skipped.rep_id));

  for rep in candidates {
    let Some((date, _)) = free_slot(conn, config, rep.id, skipped.planned_date)? else {
      continue;
    };

    let follow_up = ScheduledVisit {
      id:             Uuid::new_v4(),
      trade_point_id: skipped.trade_point_id,
      rep_id:         rep.id,
      planned_date:   date,
      status:         VisitStatus::Rescheduled,
      created_at:     Utc::now(),
    };
    queries::insert_visit(conn, &follow_up, None)?;
    info!(
      visit_id = %skipped.id,
      follow_up_id = %follow_up.id,
      rep_id = %rep.id,
      date = %date,
      "rescheduled skipped visit"
    );
    return Ok(Some(follow_up));
  }

  warn!(
    visit_id = %skipped.id,
    trade_point_id = %skipped.trade_point_id,
    after = %skipped.planned_date,
    lookahead_days = config.recovery_lookahead_days,
    "no free slot for skipped visit; trade point left uncovered"
  );
  Ok(None)
}

/// The first working day after `after` on which `rep_id` has room.
fn free_slot(
  conn: &Connection,
  config: &SchedulingConfig,
  rep_id: Uuid,
  after: NaiveDate,
) -> Result<Option<(NaiveDate, u32)>> {
  let capacity = config.daily_capacity();
  next_available_slot(after, config.recovery_lookahead_days, |day| {
    Ok(capacity.saturating_sub(queries::open_load(conn, rep_id, day)?))
  })
}
