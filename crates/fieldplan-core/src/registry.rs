//! Trade points and representatives — the read-mostly registries the
//! scheduler plans against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::policy::Category;

// ─── Trade points ────────────────────────────────────────────────────────────

/// A retail location requiring periodic visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePoint {
  pub id:         Uuid,
  pub name:       String,
  /// Trade points without a category are never scheduled.
  pub category:   Option<Category>,
  pub city:       Option<String>,
  pub district:   Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::ScheduleStore::add_trade_point`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTradePoint {
  pub name:     String,
  pub category: Option<Category>,
  pub city:     Option<String>,
  pub district: Option<String>,
}

impl NewTradePoint {
  pub fn new(name: impl Into<String>, category: Category) -> Self {
    Self { name: name.into(), category: Some(category), ..Default::default() }
  }
}

// ─── Representatives ─────────────────────────────────────────────────────────

/// Availability of a representative. Only `Active` ones receive new work.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RepStatus {
  #[default]
  Active,
  Sick,
  Vacation,
  Unavailable,
}

/// A mobile sales representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Representative {
  pub id:         Uuid,
  pub name:       String,
  pub status:     RepStatus,
  pub created_at: DateTime<Utc>,
}

impl Representative {
  pub fn is_active(&self) -> bool { self.status == RepStatus::Active }
}

/// Input to [`crate::store::ScheduleStore::add_representative`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewRepresentative {
  pub name:   String,
  #[serde(default)]
  pub status: RepStatus,
}

impl NewRepresentative {
  pub fn active(name: impl Into<String>) -> Self {
    Self { name: name.into(), status: RepStatus::Active }
  }
}
