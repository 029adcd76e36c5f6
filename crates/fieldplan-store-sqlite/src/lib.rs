//! SQLite backend for the field-visit scheduler.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! connection thread without blocking the async runtime. Every engine
//! operation runs inside a single `IMMEDIATE` transaction.

mod disruption;
mod encode;
mod plan;
mod queries;
mod reads;
mod recovery;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
