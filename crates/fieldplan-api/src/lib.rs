//! JSON REST API for the field-visit scheduler.
//!
//! Exposes an axum [`Router`] backed by any
//! [`fieldplan_core::store::ScheduleStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", fieldplan_api::api_router(store.clone()))
//! ```

pub mod disruptions;
pub mod error;
pub mod params;
pub mod registry;
pub mod schedule;
pub mod visits;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use fieldplan_core::store::ScheduleStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ScheduleStore + 'static,
{
  Router::new()
    // Schedule
    .route("/schedule", get(schedule::monthly::<S>))
    .route("/schedule/generate", post(schedule::generate::<S>))
    .route("/schedule/daily", get(schedule::daily::<S>))
    .route("/schedule/visits/{id}", get(schedule::get_visit::<S>))
    .route("/schedule/visits/{id}/status", patch(schedule::update_status::<S>))
    // Disruptions
    .route(
      "/disruptions",
      get(disruptions::list::<S>).post(disruptions::create::<S>),
    )
    // Registries
    .route(
      "/trade-points",
      get(registry::list_trade_points::<S>).post(registry::create_trade_point::<S>),
    )
    .route("/trade-points/{id}", get(registry::get_trade_point::<S>))
    .route(
      "/representatives",
      get(registry::list_representatives::<S>)
        .post(registry::create_representative::<S>),
    )
    .route("/representatives/{id}", get(registry::get_representative::<S>))
    .route("/representatives/{id}/status", patch(registry::set_status::<S>))
    // Visit history
    .route("/visits", get(visits::list::<S>))
    .route("/visits/stats", get(visits::stats::<S>))
    .with_state(store)
}
