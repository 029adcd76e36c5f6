//! Force-majeure events and the redistribution of a representative's work.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  calendar::{next_working_day, working_days_from},
  capacity::next_available_slot,
};

/// What made the representative unavailable.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DisruptionKind {
  Illness,
  Weather,
  VehicleBreakdown,
  Other,
}

/// Input to [`crate::store::ScheduleStore::record_disruption`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewDisruption {
  pub rep_id:      Uuid,
  pub event_date:  NaiveDate,
  pub kind:        DisruptionKind,
  pub description: Option<String>,
}

/// Trade points handed to one representative for one new date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redistribution {
  pub rep_id:          Uuid,
  pub rep_name:        String,
  pub trade_point_ids: Vec<Uuid>,
  pub new_date:        NaiveDate,
}

/// Append-only audit record of one disruption handling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisruptionEvent {
  pub id:                              Uuid,
  pub kind:                            DisruptionKind,
  pub rep_id:                          Uuid,
  pub rep_name:                        String,
  pub event_date:                      NaiveDate,
  pub description:                     Option<String>,
  pub affected_trade_point_ids:        Vec<Uuid>,
  pub affected_count:                  usize,
  pub redistributed_to:                Vec<Redistribution>,
  /// Affected trade points no receiver could take within the lookahead.
  pub unredistributed_trade_point_ids: Vec<Uuid>,
  pub created_at:                      DateTime<Utc>,
}

impl DisruptionEvent {
  pub fn redistributed_count(&self) -> usize {
    self.redistributed_to.iter().map(|r| r.trade_point_ids.len()).sum()
  }
}

/// Split `items` into `n` chunks dealt one by one in order, so chunk sizes
/// differ by at most one. `n == 0` yields no chunks.
pub fn round_robin<T: Clone>(items: &[T], n: usize) -> Vec<Vec<T>> {
  let mut chunks: Vec<Vec<T>> = vec![Vec::new(); n];
  if n == 0 {
    return chunks;
  }
  for (i, item) in items.iter().enumerate() {
    chunks[i % n].push(item.clone());
  }
  chunks
}

/// Where a chunk of trade points landed for one receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkPlacement {
  pub days:     Vec<(NaiveDate, Vec<Uuid>)>,
  pub unplaced: Vec<Uuid>,
}

/// Place `ids` on a receiver's working days after `after`, filling each day
/// only up to the free capacity `remaining` reports. Each day with room takes
/// as many of the remaining ids as fit; the rest spills onto later days within
/// `lookahead_days` working days.
pub fn place_chunk<E>(
  ids: &[Uuid],
  after: NaiveDate,
  lookahead_days: u32,
  mut remaining: impl FnMut(NaiveDate) -> Result<u32, E>,
) -> Result<ChunkPlacement, E> {
  let mut placement = ChunkPlacement::default();
  let mut left = ids;
  let mut cursor = after;
  let mut budget = lookahead_days;

  while !left.is_empty() && budget > 0 {
    let Some((day, room)) = next_available_slot(cursor, budget, &mut remaining)? else {
      break;
    };
    let scanned = working_days_from(next_working_day(cursor), budget)
      .take_while(|d| *d <= day)
      .count() as u32;
    budget = budget.saturating_sub(scanned);

    let take = left.len().min(room as usize);
    placement.days.push((day, left[..take].to_vec()));
    left = &left[take..];
    cursor = day;
  }

  placement.unplaced = left.to_vec();
  Ok(placement)
}
