//! Error type for `fieldplan-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] fieldplan_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {what}: {value:?}")]
  Decode { what: &'static str, value: String },
}

/// Errors raised inside a connection closure travel through
/// [`tokio_rusqlite::Error::Other`]; recover the typed error here.
impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Other(inner) => match inner.downcast::<Error>() {
        Ok(err) => *err,
        Err(other) => Error::Database(tokio_rusqlite::Error::Other(other)),
      },
      tokio_rusqlite::Error::Rusqlite(e) => Error::Sqlite(e),
      other => Error::Database(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
