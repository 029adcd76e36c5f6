//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, dates `YYYY-MM-DD`, times `HH:MM:SS`
//! with an optional fractional part.
//! Enums are stored under their snake_case names. UUIDs are hyphenated
//! lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fieldplan_core::{
  disruption::{DisruptionEvent, DisruptionKind, Redistribution},
  policy::Category,
  registry::{RepStatus, Representative, TradePoint},
  visit::{PlannedVisitView, ScheduledVisit, VisitRecord, VisitStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S%.f").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Parse a strum-backed enum column.
fn decode_enum<T: FromStr>(what: &'static str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::Decode { what, value: s.to_owned() })
}

pub fn decode_category(s: &str) -> Result<Category> { decode_enum("category", s) }

pub fn decode_rep_status(s: &str) -> Result<RepStatus> {
  decode_enum("representative status", s)
}

pub fn decode_visit_status(s: &str) -> Result<VisitStatus> {
  decode_enum("visit status", s)
}

pub fn decode_disruption_kind(s: &str) -> Result<DisruptionKind> {
  decode_enum("disruption kind", s)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `trade_points` row.
pub struct RawTradePoint {
  pub id:         String,
  pub name:       String,
  pub category:   Option<String>,
  pub city:       Option<String>,
  pub district:   Option<String>,
  pub created_at: String,
}

impl RawTradePoint {
  pub const COLUMNS: &'static str = "id, name, category, city, district, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      category:   row.get(2)?,
      city:       row.get(3)?,
      district:   row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_trade_point(self) -> Result<TradePoint> {
    Ok(TradePoint {
      id:         decode_uuid(&self.id)?,
      name:       self.name,
      category:   self.category.as_deref().map(decode_category).transpose()?,
      city:       self.city,
      district:   self.district,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `representatives` row.
pub struct RawRepresentative {
  pub id:         String,
  pub name:       String,
  pub status:     String,
  pub created_at: String,
}

impl RawRepresentative {
  pub const COLUMNS: &'static str = "id, name, status, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      status:     row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_representative(self) -> Result<Representative> {
    Ok(Representative {
      id:         decode_uuid(&self.id)?,
      name:       self.name,
      status:     decode_rep_status(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `scheduled_visits` row.
pub struct RawVisit {
  pub id:             String,
  pub trade_point_id: String,
  pub rep_id:         String,
  pub planned_date:   String,
  pub status:         String,
  pub created_at:     String,
}

impl RawVisit {
  pub const COLUMNS: &'static str =
    "id, trade_point_id, rep_id, planned_date, status, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      trade_point_id: row.get(1)?,
      rep_id:         row.get(2)?,
      planned_date:   row.get(3)?,
      status:         row.get(4)?,
      created_at:     row.get(5)?,
    })
  }

  pub fn into_visit(self) -> Result<ScheduledVisit> {
    Ok(ScheduledVisit {
      id:             decode_uuid(&self.id)?,
      trade_point_id: decode_uuid(&self.trade_point_id)?,
      rep_id:         decode_uuid(&self.rep_id)?,
      planned_date:   decode_date(&self.planned_date)?,
      status:         decode_visit_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// A `scheduled_visits` row joined with trade-point and representative
/// names.
pub struct RawVisitView {
  pub id:               String,
  pub trade_point_id:   String,
  pub trade_point_name: String,
  pub category:         Option<String>,
  pub rep_id:           String,
  pub rep_name:         String,
  pub planned_date:     String,
  pub status:           String,
}

impl RawVisitView {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      trade_point_id:   row.get(1)?,
      trade_point_name: row.get(2)?,
      category:         row.get(3)?,
      rep_id:           row.get(4)?,
      rep_name:         row.get(5)?,
      planned_date:     row.get(6)?,
      status:           row.get(7)?,
    })
  }

  pub fn into_view(self) -> Result<PlannedVisitView> {
    Ok(PlannedVisitView {
      id:               decode_uuid(&self.id)?,
      trade_point_id:   decode_uuid(&self.trade_point_id)?,
      trade_point_name: self.trade_point_name,
      category:         self.category.as_deref().map(decode_category).transpose()?,
      rep_id:           decode_uuid(&self.rep_id)?,
      rep_name:         self.rep_name,
      planned_date:     decode_date(&self.planned_date)?,
      status:           decode_visit_status(&self.status)?,
    })
  }
}

/// Raw strings read directly from a `visit_records` row.
pub struct RawVisitRecord {
  pub id:             String,
  pub schedule_id:    Option<String>,
  pub trade_point_id: String,
  pub rep_id:         String,
  pub visited_date:   String,
  pub time_in:        Option<String>,
  pub time_out:       Option<String>,
  pub notes:          Option<String>,
  pub created_at:     String,
}

impl RawVisitRecord {
  pub const COLUMNS: &'static str = "id, schedule_id, trade_point_id, rep_id, \
                                     visited_date, time_in, time_out, notes, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      schedule_id:    row.get(1)?,
      trade_point_id: row.get(2)?,
      rep_id:         row.get(3)?,
      visited_date:   row.get(4)?,
      time_in:        row.get(5)?,
      time_out:       row.get(6)?,
      notes:          row.get(7)?,
      created_at:     row.get(8)?,
    })
  }

  pub fn into_record(self) -> Result<VisitRecord> {
    Ok(VisitRecord {
      id:             decode_uuid(&self.id)?,
      schedule_id:    self.schedule_id.as_deref().map(decode_uuid).transpose()?,
      trade_point_id: decode_uuid(&self.trade_point_id)?,
      rep_id:         decode_uuid(&self.rep_id)?,
      visited_date:   decode_date(&self.visited_date)?,
      time_in:        self.time_in.as_deref().map(decode_time).transpose()?,
      time_out:       self.time_out.as_deref().map(decode_time).transpose()?,
      notes:          self.notes,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// A `disruption_events` row joined with the disrupted representative's
/// name.
pub struct RawDisruption {
  pub id:                  String,
  pub kind:                String,
  pub rep_id:              String,
  pub rep_name:            String,
  pub event_date:          String,
  pub description:         Option<String>,
  pub affected_json:       String,
  pub redistribution_json: String,
  pub unplaced_json:       String,
  pub created_at:          String,
}

impl RawDisruption {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      kind:                row.get(1)?,
      rep_id:              row.get(2)?,
      rep_name:            row.get(3)?,
      event_date:          row.get(4)?,
      description:         row.get(5)?,
      affected_json:       row.get(6)?,
      redistribution_json: row.get(7)?,
      unplaced_json:       row.get(8)?,
      created_at:          row.get(9)?,
    })
  }

  pub fn into_event(self) -> Result<DisruptionEvent> {
    let affected: Vec<Uuid> = serde_json::from_str(&self.affected_json)?;
    let redistributed_to: Vec<Redistribution> =
      serde_json::from_str(&self.redistribution_json)?;
    let unplaced: Vec<Uuid> = serde_json::from_str(&self.unplaced_json)?;

    Ok(DisruptionEvent {
      id: decode_uuid(&self.id)?,
      kind: decode_disruption_kind(&self.kind)?,
      rep_id: decode_uuid(&self.rep_id)?,
      rep_name: self.rep_name,
      event_date: decode_date(&self.event_date)?,
      description: self.description,
      affected_count: affected.len(),
      affected_trade_point_ids: affected,
      redistributed_to,
      unredistributed_trade_point_ids: unplaced,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_and_times_use_fixed_formats() {
    let d = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
    assert_eq!(encode_date(d), "2026-02-05");
    assert_eq!(decode_date("2026-02-05").unwrap(), d);

    let t = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
    assert_eq!(encode_time(t), "09:05:00");
    assert_eq!(decode_time("09:05:00").unwrap(), t);

    let precise = NaiveTime::from_hms_milli_opt(17, 45, 12, 250).unwrap();
    assert_eq!(encode_time(precise), "17:45:12.250");
    assert_eq!(decode_time(&encode_time(precise)).unwrap(), precise);
  }

  #[test]
  fn unknown_enum_values_are_reported() {
    let err = decode_visit_status("lost").unwrap_err();
    assert!(matches!(err, Error::Decode { what: "visit status", .. }));
    assert_eq!(decode_rep_status("sick").unwrap(), RepStatus::Sick);
    assert_eq!(
      decode_disruption_kind("vehicle_breakdown").unwrap(),
      DisruptionKind::VehicleBreakdown
    );
  }
}
