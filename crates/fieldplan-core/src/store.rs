//! The `ScheduleStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `fieldplan-store-sqlite`). Higher layers (`fieldplan-api`, the server)
//! depend on this abstraction, not on any concrete backend.
//!
//! Every mutating scheduling operation is atomic: it either commits all of
//! its writes or none of them.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  disruption::{DisruptionEvent, NewDisruption},
  period::Month,
  planner::PlanSummary,
  registry::{NewRepresentative, NewTradePoint, RepStatus, Representative, TradePoint},
  visit::{
    DailyRoute, MonthlyPlan, ScheduledVisit, StatusChange, StatusUpdate,
    VisitRecord, VisitStats,
  },
};

/// Abstraction over a scheduling backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Registries ────────────────────────────────────────────────────────

  fn add_trade_point(
    &self,
    input: NewTradePoint,
  ) -> impl Future<Output = Result<TradePoint, Self::Error>> + Send + '_;

  fn get_trade_point(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<TradePoint>, Self::Error>> + Send + '_;

  fn list_trade_points(
    &self,
  ) -> impl Future<Output = Result<Vec<TradePoint>, Self::Error>> + Send + '_;

  fn add_representative(
    &self,
    input: NewRepresentative,
  ) -> impl Future<Output = Result<Representative, Self::Error>> + Send + '_;

  fn get_representative(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Representative>, Self::Error>> + Send + '_;

  /// All representatives in registry order (creation order).
  fn list_representatives(
    &self,
  ) -> impl Future<Output = Result<Vec<Representative>, Self::Error>> + Send + '_;

  fn set_representative_status(
    &self,
    id: Uuid,
    status: RepStatus,
  ) -> impl Future<Output = Result<Representative, Self::Error>> + Send + '_;

  // ── Scheduling engine ─────────────────────────────────────────────────

  /// Replace every scheduled visit of `month` with a freshly generated plan.
  ///
  /// `rep_ids` restricts the plan to a subset of the active representatives.
  fn generate_monthly_plan(
    &self,
    month: Month,
    rep_ids: Option<Vec<Uuid>>,
  ) -> impl Future<Output = Result<PlanSummary, Self::Error>> + Send + '_;

  /// Apply a status change to a scheduled visit. Completing a visit records
  /// it; skipping one searches for a follow-up slot.
  fn update_visit_status(
    &self,
    visit_id: Uuid,
    update: StatusUpdate,
  ) -> impl Future<Output = Result<StatusChange, Self::Error>> + Send + '_;

  /// Cancel a representative's planned visits for a date and hand them to
  /// the other active representatives.
  fn record_disruption(
    &self,
    input: NewDisruption,
  ) -> impl Future<Output = Result<DisruptionEvent, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn get_visit(
    &self,
    visit_id: Uuid,
  ) -> impl Future<Output = Result<Option<ScheduledVisit>, Self::Error>> + Send + '_;

  fn get_monthly_plan(
    &self,
    month: Month,
    rep_id: Option<Uuid>,
  ) -> impl Future<Output = Result<MonthlyPlan, Self::Error>> + Send + '_;

  fn get_daily_plan(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<DailyRoute>, Self::Error>> + Send + '_;

  fn list_disruptions(
    &self,
    month: Month,
  ) -> impl Future<Output = Result<Vec<DisruptionEvent>, Self::Error>> + Send + '_;

  fn list_visit_records(
    &self,
    month: Month,
    rep_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<VisitRecord>, Self::Error>> + Send + '_;

  fn visit_stats(
    &self,
    month: Month,
  ) -> impl Future<Output = Result<VisitStats, Self::Error>> + Send + '_;
}
