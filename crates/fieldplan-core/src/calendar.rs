//! Working-day calendar: Monday to Friday, grouped by ISO week.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::period::Month;

pub fn is_working_day(date: NaiveDate) -> bool {
  !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All Monday–Friday dates of `month`, ascending.
pub fn working_days(month: Month) -> Vec<NaiveDate> {
  month.days().filter(|d| is_working_day(*d)).collect()
}

/// Partition working days by ISO week, preserving week order.
///
/// `days` must be ascending; consecutive days sharing an ISO week land in the
/// same group.
pub fn week_groups(days: &[NaiveDate]) -> Vec<Vec<NaiveDate>> {
  let mut groups: Vec<Vec<NaiveDate>> = Vec::new();
  for &day in days {
    match groups.last_mut() {
      Some(group) if group[0].iso_week() == day.iso_week() => group.push(day),
      _ => groups.push(vec![day]),
    }
  }
  groups
}

/// The first working day strictly after `date`.
pub fn next_working_day(date: NaiveDate) -> NaiveDate {
  let mut next = date.succ_opt().unwrap_or(date);
  while !is_working_day(next) {
    match next.succ_opt() {
      Some(d) => next = d,
      None => break,
    }
  }
  next
}

/// `count` consecutive working days starting at `start` (inclusive when
/// `start` is itself a working day).
pub fn working_days_from(
  start: NaiveDate,
  count: u32,
) -> impl Iterator<Item = NaiveDate> {
  let first = if is_working_day(start) { start } else { next_working_day(start) };
  std::iter::successors(Some(first), |d| Some(next_working_day(*d)))
    .take(count as usize)
}
