//! Query-string parsing shared by the handlers.
//!
//! Periods and dates arrive as plain strings so malformed values surface as
//! `InvalidPeriod` with a JSON body instead of axum's extractor rejection.

use chrono::NaiveDate;
use fieldplan_core::{Error as CoreError, period::Month};

use crate::error::ApiError;

/// Parse `YYYY-MM`, defaulting to the current month when absent.
pub fn month_or_current(raw: Option<&str>) -> Result<Month, ApiError> {
  match raw {
    Some(s) => Ok(s.parse::<Month>()?),
    None => Ok(Month::current()),
  }
}

pub fn date(raw: &str) -> Result<NaiveDate, ApiError> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .map_err(|_| CoreError::InvalidPeriod(format!("bad date {raw:?}")).into())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn month_defaults_to_current() {
    assert_eq!(month_or_current(None).unwrap(), Month::current());
    assert_eq!(month_or_current(Some("2026-02")).unwrap(), Month::new(2026, 2).unwrap());
    assert!(matches!(month_or_current(Some("2026-13")), Err(ApiError::BadRequest(_))));
  }

  #[test]
  fn dates_must_be_iso() {
    assert_eq!(date("2026-02-05").unwrap(), NaiveDate::from_ymd_opt(2026, 2, 5).unwrap());
    assert!(matches!(date("05.02.2026"), Err(ApiError::BadRequest(_))));
  }
}
