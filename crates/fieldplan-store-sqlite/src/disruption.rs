//! Force-majeure handling: cancel a representative's day and hand the work to
//! the other active representatives.

use chrono::Utc;
use fieldplan_core::{
  capacity::SchedulingConfig,
  disruption::{
    DisruptionEvent, DisruptionKind, NewDisruption, Redistribution, place_chunk,
    round_robin,
  },
  registry::RepStatus,
  visit::{ScheduledVisit, VisitStatus},
};
use rusqlite::Connection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{Result, queries};

pub fn handle(
  conn: &Connection,
  config: &SchedulingConfig,
  input: NewDisruption,
) -> Result<DisruptionEvent> {
  let rep = queries::select_representative(conn, input.rep_id)?
    .ok_or(fieldplan_core::Error::RepresentativeNotFound(input.rep_id))?;

  let affected =
    queries::select_visits_on(conn, rep.id, input.event_date, VisitStatus::Planned)?;
  let affected_ids: Vec<Uuid> = affected.iter().map(|v| v.trade_point_id).collect();

  let peers: Vec<_> = queries::select_representatives(conn, Some(RepStatus::Active))?
    .into_iter()
    .filter(|r| r.id != rep.id)
    .collect();

  let mut redistributed_to = Vec::new();
  let mut unplaced = Vec::new();

  if peers.is_empty() {
    if !affected_ids.is_empty() {
      warn!(
        rep_id = %rep.id,
        date = %input.event_date,
        affected = affected_ids.len(),
        "no active representatives to take over; visits cancelled without replacement"
      );
    }
    unplaced.extend_from_slice(&affected_ids);
  } else {
    let capacity = config.daily_capacity();
    let chunks = round_robin(&affected_ids, peers.len());

    for (peer, chunk) in peers.iter().zip(chunks) {
      if chunk.is_empty() {
        continue;
      }
      let placement =
        place_chunk(&chunk, input.event_date, config.recovery_lookahead_days, |day| {
          Ok::<_, crate::Error>(
            capacity.saturating_sub(queries::open_load(conn, peer.id, day)?),
          )
        })?;

      let now = Utc::now();
      for (new_date, trade_point_ids) in placement.days {
        for &trade_point_id in &trade_point_ids {
          let visit = ScheduledVisit {
            id: Uuid::new_v4(),
            trade_point_id,
            rep_id: peer.id,
            planned_date: new_date,
            status: VisitStatus::Rescheduled,
            created_at: now,
          };
          queries::insert_visit(conn, &visit, None)?;
        }
        redistributed_to.push(Redistribution {
          rep_id: peer.id,
          rep_name: peer.name.clone(),
          trade_point_ids,
          new_date,
        });
      }

      for trade_point_id in &placement.unplaced {
        warn!(
          rep_id = %peer.id,
          trade_point_id = %trade_point_id,
          after = %input.event_date,
          lookahead_days = config.recovery_lookahead_days,
          "no free slot for redistributed visit; trade point left uncovered"
        );
      }
      unplaced.extend(placement.unplaced);
    }
  }

  for visit in &affected {
    queries::update_visit_status(conn, visit.id, VisitStatus::Cancelled)?;
  }

  if input.kind == DisruptionKind::Illness {
    queries::update_representative_status(conn, rep.id, RepStatus::Sick)?;
  }

  let event = DisruptionEvent {
    id: Uuid::new_v4(),
    kind: input.kind,
    rep_id: rep.id,
    rep_name: rep.name,
    event_date: input.event_date,
    description: input.description,
    affected_count: affected_ids.len(),
    affected_trade_point_ids: affected_ids,
    redistributed_to,
    unredistributed_trade_point_ids: unplaced,
    created_at: Utc::now(),
  };
  queries::insert_disruption(conn, &event)?;

  info!(
    rep_id = %event.rep_id,
    date = %event.event_date,
    kind = %event.kind,
    affected = event.affected_count,
    redistributed = event.redistributed_count(),
    unredistributed = event.unredistributed_trade_point_ids.len(),
    "handled disruption"
  );
  Ok(event)
}
