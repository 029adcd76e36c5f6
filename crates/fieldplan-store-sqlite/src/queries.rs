//! Synchronous SQL helpers. Each runs on the connection thread, usually
//! inside a transaction opened by the caller.

use chrono::NaiveDate;
use fieldplan_core::{
  disruption::DisruptionEvent,
  period::Month,
  registry::{RepStatus, Representative, TradePoint},
  visit::{PlannedVisitView, ScheduledVisit, VisitRecord, VisitStatus},
};
use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawDisruption, RawRepresentative, RawTradePoint, RawVisit, RawVisitRecord,
    RawVisitView, decode_date, decode_uuid, encode_date, encode_dt, encode_time,
    encode_uuid,
  },
};

// ─── Trade points ────────────────────────────────────────────────────────────

pub fn insert_trade_point(conn: &Connection, tp: &TradePoint) -> Result<()> {
  conn.execute(
    "INSERT INTO trade_points (id, name, category, city, district, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      encode_uuid(tp.id),
      tp.name,
      tp.category.map(|c| c.to_string()),
      tp.city,
      tp.district,
      encode_dt(tp.created_at),
    ],
  )?;
  Ok(())
}

pub fn select_trade_point(conn: &Connection, id: Uuid) -> Result<Option<TradePoint>> {
  let raw = conn
    .query_row(
      &format!("SELECT {} FROM trade_points WHERE id = ?1", RawTradePoint::COLUMNS),
      params![encode_uuid(id)],
      RawTradePoint::from_row,
    )
    .optional()?;
  raw.map(RawTradePoint::into_trade_point).transpose()
}

pub fn select_trade_points(conn: &Connection) -> Result<Vec<TradePoint>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM trade_points ORDER BY rowid",
    RawTradePoint::COLUMNS
  ))?;
  let raws = stmt
    .query_map([], RawTradePoint::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawTradePoint::into_trade_point).collect()
}

// ─── Representatives ─────────────────────────────────────────────────────────

pub fn insert_representative(conn: &Connection, rep: &Representative) -> Result<()> {
  conn.execute(
    "INSERT INTO representatives (id, name, status, created_at) VALUES (?1, ?2, ?3, ?4)",
    params![
      encode_uuid(rep.id),
      rep.name,
      rep.status.to_string(),
      encode_dt(rep.created_at),
    ],
  )?;
  Ok(())
}

pub fn select_representative(
  conn: &Connection,
  id: Uuid,
) -> Result<Option<Representative>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {} FROM representatives WHERE id = ?1",
        RawRepresentative::COLUMNS
      ),
      params![encode_uuid(id)],
      RawRepresentative::from_row,
    )
    .optional()?;
  raw.map(RawRepresentative::into_representative).transpose()
}

/// Representatives in registry order, optionally only those in `status`.
pub fn select_representatives(
  conn: &Connection,
  status: Option<RepStatus>,
) -> Result<Vec<Representative>> {
  let sql = format!(
    "SELECT {} FROM representatives
     WHERE ?1 IS NULL OR status = ?1
     ORDER BY rowid",
    RawRepresentative::COLUMNS
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(
      params![status.map(|s| s.to_string())],
      RawRepresentative::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawRepresentative::into_representative).collect()
}

/// Returns `false` when no such representative exists.
pub fn update_representative_status(
  conn: &Connection,
  id: Uuid,
  status: RepStatus,
) -> Result<bool> {
  let changed = conn.execute(
    "UPDATE representatives SET status = ?2 WHERE id = ?1",
    params![encode_uuid(id), status.to_string()],
  )?;
  Ok(changed > 0)
}

// ─── Scheduled visits ────────────────────────────────────────────────────────

/// Insert `visit`, tagging it with the month whose plan produced it, if any.
pub fn insert_visit(
  conn: &Connection,
  visit: &ScheduledVisit,
  plan_month: Option<Month>,
) -> Result<()> {
  conn.execute(
    "INSERT INTO scheduled_visits
       (id, trade_point_id, rep_id, planned_date, status, plan_month, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    params![
      encode_uuid(visit.id),
      encode_uuid(visit.trade_point_id),
      encode_uuid(visit.rep_id),
      encode_date(visit.planned_date),
      visit.status.to_string(),
      plan_month.map(|m| m.to_string()),
      encode_dt(visit.created_at),
    ],
  )?;
  Ok(())
}

pub fn select_visit(conn: &Connection, id: Uuid) -> Result<Option<ScheduledVisit>> {
  let raw = conn
    .query_row(
      &format!("SELECT {} FROM scheduled_visits WHERE id = ?1", RawVisit::COLUMNS),
      params![encode_uuid(id)],
      RawVisit::from_row,
    )
    .optional()?;
  raw.map(RawVisit::into_visit).transpose()
}

/// A representative's visits on one date in `status`, in creation order.
pub fn select_visits_on(
  conn: &Connection,
  rep_id: Uuid,
  date: NaiveDate,
  status: VisitStatus,
) -> Result<Vec<ScheduledVisit>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM scheduled_visits
     WHERE rep_id = ?1 AND planned_date = ?2 AND status = ?3
     ORDER BY rowid",
    RawVisit::COLUMNS
  ))?;
  let raws = stmt
    .query_map(
      params![encode_uuid(rep_id), encode_date(date), status.to_string()],
      RawVisit::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawVisit::into_visit).collect()
}

pub fn update_visit_status(
  conn: &Connection,
  id: Uuid,
  status: VisitStatus,
) -> Result<()> {
  conn.execute(
    "UPDATE scheduled_visits SET status = ?2 WHERE id = ?1",
    params![encode_uuid(id), status.to_string()],
  )?;
  Ok(())
}

/// Delete every scheduled visit dated within `month`, plus the rows an earlier
/// plan for `month` spilled past its end.
pub fn delete_month_plan(conn: &Connection, month: Month) -> Result<usize> {
  Ok(conn.execute(
    "DELETE FROM scheduled_visits
     WHERE planned_date BETWEEN ?1 AND ?2 OR plan_month = ?3",
    params![
      encode_date(month.first_day()),
      encode_date(month.last_day()),
      month.to_string(),
    ],
  )?)
}

/// Number of capacity-occupying visits a representative has on `date`.
pub fn open_load(conn: &Connection, rep_id: Uuid, date: NaiveDate) -> Result<u32> {
  let count: u32 = conn.query_row(
    "SELECT COUNT(*) FROM scheduled_visits
     WHERE rep_id = ?1 AND planned_date = ?2 AND status IN ('planned', 'rescheduled')",
    params![encode_uuid(rep_id), encode_date(date)],
    |r| r.get(0),
  )?;
  Ok(count)
}

/// Capacity-occupying visit counts per (representative, date) within
/// `[from, to]`.
pub fn open_loads_between(
  conn: &Connection,
  from: NaiveDate,
  to: NaiveDate,
) -> Result<Vec<(Uuid, NaiveDate, u32)>> {
  let mut stmt = conn.prepare(
    "SELECT rep_id, planned_date, COUNT(*) FROM scheduled_visits
     WHERE planned_date BETWEEN ?1 AND ?2 AND status IN ('planned', 'rescheduled')
     GROUP BY rep_id, planned_date",
  )?;
  let rows = stmt
    .query_map(params![encode_date(from), encode_date(to)], |r| {
      Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get::<_, u32>(2)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  rows
    .into_iter()
    .map(|(rep, date, n)| {
      Ok::<_, Error>((decode_uuid(&rep)?, decode_date(&date)?, n))
    })
    .collect()
}

/// Visits dated within `[from, to]` joined with registry names, ordered by
/// representative registry order, date and creation.
pub fn select_visit_views(
  conn: &Connection,
  from: NaiveDate,
  to: NaiveDate,
  rep_id: Option<Uuid>,
) -> Result<Vec<PlannedVisitView>> {
  let mut stmt = conn.prepare(
    "SELECT v.id, v.trade_point_id, t.name, t.category,
            v.rep_id, r.name, v.planned_date, v.status
     FROM scheduled_visits v
     JOIN trade_points    t ON t.id = v.trade_point_id
     JOIN representatives r ON r.id = v.rep_id
     WHERE v.planned_date BETWEEN ?1 AND ?2
       AND (?3 IS NULL OR v.rep_id = ?3)
     ORDER BY r.rowid, v.planned_date, v.rowid",
  )?;
  let raws = stmt
    .query_map(
      params![encode_date(from), encode_date(to), rep_id.map(encode_uuid)],
      RawVisitView::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawVisitView::into_view).collect()
}

// ─── Visit records ───────────────────────────────────────────────────────────

pub fn select_record_by_schedule(
  conn: &Connection,
  schedule_id: Uuid,
) -> Result<Option<VisitRecord>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {} FROM visit_records WHERE schedule_id = ?1",
        RawVisitRecord::COLUMNS
      ),
      params![encode_uuid(schedule_id)],
      RawVisitRecord::from_row,
    )
    .optional()?;
  raw.map(RawVisitRecord::into_record).transpose()
}

/// Insert `record`, or overwrite the row with the same id.
pub fn upsert_record(conn: &Connection, record: &VisitRecord) -> Result<()> {
  conn.execute(
    "INSERT INTO visit_records (
       id, schedule_id, trade_point_id, rep_id, visited_date,
       time_in, time_out, notes, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
     ON CONFLICT(id) DO UPDATE SET
       time_in  = excluded.time_in,
       time_out = excluded.time_out,
       notes    = excluded.notes",
    params![
      encode_uuid(record.id),
      record.schedule_id.map(encode_uuid),
      encode_uuid(record.trade_point_id),
      encode_uuid(record.rep_id),
      encode_date(record.visited_date),
      record.time_in.map(encode_time),
      record.time_out.map(encode_time),
      record.notes,
      encode_dt(record.created_at),
    ],
  )?;
  Ok(())
}

pub fn select_records(
  conn: &Connection,
  from: NaiveDate,
  to: NaiveDate,
  rep_id: Option<Uuid>,
) -> Result<Vec<VisitRecord>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM visit_records
     WHERE visited_date BETWEEN ?1 AND ?2
       AND (?3 IS NULL OR rep_id = ?3)
     ORDER BY visited_date, rowid",
    RawVisitRecord::COLUMNS
  ))?;
  let raws = stmt
    .query_map(
      params![encode_date(from), encode_date(to), rep_id.map(encode_uuid)],
      RawVisitRecord::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawVisitRecord::into_record).collect()
}

// ─── Disruption events ───────────────────────────────────────────────────────

pub fn insert_disruption(conn: &Connection, event: &DisruptionEvent) -> Result<()> {
  conn.execute(
    "INSERT INTO disruption_events (
       id, kind, rep_id, event_date, description,
       affected_json, redistribution_json, unplaced_json, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    params![
      encode_uuid(event.id),
      event.kind.to_string(),
      encode_uuid(event.rep_id),
      encode_date(event.event_date),
      event.description,
      serde_json::to_string(&event.affected_trade_point_ids)?,
      serde_json::to_string(&event.redistributed_to)?,
      serde_json::to_string(&event.unredistributed_trade_point_ids)?,
      encode_dt(event.created_at),
    ],
  )?;
  Ok(())
}

pub fn select_disruptions(
  conn: &Connection,
  from: NaiveDate,
  to: NaiveDate,
) -> Result<Vec<DisruptionEvent>> {
  let mut stmt = conn.prepare(
    "SELECT e.id, e.kind, e.rep_id, r.name, e.event_date, e.description,
            e.affected_json, e.redistribution_json, e.unplaced_json, e.created_at
     FROM disruption_events e
     JOIN representatives r ON r.id = e.rep_id
     WHERE e.event_date BETWEEN ?1 AND ?2
     ORDER BY e.event_date, e.rowid",
  )?;
  let raws = stmt
    .query_map(
      params![encode_date(from), encode_date(to)],
      RawDisruption::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawDisruption::into_event).collect()
}
