//! Calendar month used as the planning period.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A calendar month, written `YYYY-MM` on the wire.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
  /// Always the first day of the month; validated on construction.
  first: NaiveDate,
}

impl Month {
  pub fn new(year: i32, month: u32) -> Result<Self> {
    if !(1..=9999).contains(&year) {
      return Err(Error::InvalidPeriod(format!("year {year} out of range")));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
      .map(|first| Self { first })
      .ok_or_else(|| Error::InvalidPeriod(format!("{year}-{month:02}")))
  }

  /// The month containing `date`.
  pub fn of(date: NaiveDate) -> Self {
    Self { first: date.with_day(1).unwrap_or(date) }
  }

  /// The month containing today's date (UTC).
  pub fn current() -> Self { Self::of(Utc::now().date_naive()) }

  pub fn year(&self) -> i32 { self.first.year() }

  pub fn month(&self) -> u32 { self.first.month() }

  pub fn first_day(&self) -> NaiveDate { self.first }

  pub fn last_day(&self) -> NaiveDate {
    self.days().last().unwrap_or(self.first)
  }

  /// Every calendar date of the month, ascending.
  pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
    let month = self.first.month();
    self.first.iter_days().take_while(move |d| d.month() == month)
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    date.year() == self.year() && date.month() == self.month()
  }

  /// Number of the first month of the quarter this month belongs to
  /// (1, 4, 7 or 10).
  pub fn quarter_start_month(&self) -> u32 { (self.month() - 1) / 3 * 3 + 1 }
}

impl fmt::Display for Month {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year(), self.month())
  }
}

impl FromStr for Month {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidPeriod(format!("expected YYYY-MM, got {s:?}"));
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let digits = |part: &str, len: usize| {
      part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(year, 4) || !digits(month, 2) {
      return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    Self::new(year, month)
  }
}

impl TryFrom<String> for Month {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<Month> for String {
  fn from(m: Month) -> Self { m.to_string() }
}
