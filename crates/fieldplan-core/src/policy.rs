//! Visit-frequency policy: how often a trade point of each category is visited
//! within a month.
//!
//! This is the only place cadence rules live. Everything else consumes the
//! dates produced by [`visit_dates`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Trade-point category. `A` is visited most often, `D` once a quarter.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
pub enum Category {
  A,
  B,
  C,
  D,
}

impl Category {
  /// Scheduling priority within a day; lower goes first.
  pub fn priority(self) -> u8 {
    match self {
      Self::A => 1,
      Self::B => 2,
      Self::C => 3,
      Self::D => 4,
    }
  }
}

/// Target visit dates for one trade point of `category`.
///
/// - `weeks`: working days grouped by ISO week (see
///   [`crate::calendar::week_groups`]).
/// - `all_days`: every working day of the month, ascending.
/// - `quarter_start_month` / `current_month`: month numbers (1–12).
///
/// The result is ascending and free of duplicates.
pub fn visit_dates(
  category: Category,
  weeks: &[Vec<NaiveDate>],
  all_days: &[NaiveDate],
  quarter_start_month: u32,
  current_month: u32,
) -> Vec<NaiveDate> {
  if weeks.is_empty() || all_days.is_empty() {
    return Vec::new();
  }
  let week_start = |i: usize| weeks.get(i).and_then(|w| w.first()).copied();

  let mut dates: Vec<NaiveDate> = match category {
    Category::A => (0..3).filter_map(week_start).collect(),
    Category::B => [week_start(0), week_start(2).or_else(|| week_start(1))]
      .into_iter()
      .flatten()
      .collect(),
    Category::C => vec![all_days[all_days.len() / 2]],
    Category::D if current_month == quarter_start_month => vec![all_days[0]],
    Category::D => Vec::new(),
  };
  dates.sort_unstable();
  dates.dedup();
  dates
}
