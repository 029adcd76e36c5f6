//! Core types and scheduling logic for the field-visit planner.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the calendar and cadence rules, the capacity model, the pure assignment
//! algorithms and the [`store::ScheduleStore`] trait that backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod calendar;
pub mod capacity;
pub mod disruption;
pub mod error;
pub mod period;
pub mod planner;
pub mod policy;
pub mod registry;
pub mod store;
pub mod visit;

pub use error::{Error, Result};
