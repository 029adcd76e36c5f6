//! [`SqliteStore`] — the SQLite implementation of [`ScheduleStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use fieldplan_core::{
  capacity::SchedulingConfig,
  disruption::{DisruptionEvent, NewDisruption},
  period::Month,
  planner::PlanSummary,
  registry::{NewRepresentative, NewTradePoint, RepStatus, Representative, TradePoint},
  store::ScheduleStore,
  visit::{
    DailyRoute, MonthlyPlan, ScheduledVisit, StatusChange, StatusUpdate,
    VisitRecord, VisitStats,
  },
};
use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::{Error, Result, disruption, plan, queries, reads, recovery, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A scheduling store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  config: SchedulingConfig,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, config: SchedulingConfig::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, config: SchedulingConfig::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the scheduling parameters every engine operation runs with.
  pub fn with_scheduling(mut self, config: SchedulingConfig) -> Self {
    self.config = config;
    self
  }

  pub fn scheduling(&self) -> &SchedulingConfig { &self.config }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside one `IMMEDIATE` transaction. The write lock is held from
  /// the first read, and an error from `f` rolls everything back.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection, &SchedulingConfig) -> Result<T> + Send + 'static,
  {
    let config = self.config.clone();
    let value = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx, &config).map_err(boxed)?;
        tx.commit()?;
        Ok(value)
      })
      .await?;
    Ok(value)
  }

  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection, &SchedulingConfig) -> Result<T> + Send + 'static,
  {
    let config = self.config.clone();
    let value = self
      .conn
      .call(move |conn| f(conn, &config).map_err(boxed))
      .await?;
    Ok(value)
  }
}

fn boxed(e: Error) -> tokio_rusqlite::Error { tokio_rusqlite::Error::Other(Box::new(e)) }

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  // ── Registries ────────────────────────────────────────────────────────────

  async fn add_trade_point(&self, input: NewTradePoint) -> Result<TradePoint> {
    let tp = TradePoint {
      id:         Uuid::new_v4(),
      name:       input.name,
      category:   input.category,
      city:       input.city,
      district:   input.district,
      created_at: Utc::now(),
    };

    let row = tp.clone();
    self
      .write(move |conn, _| queries::insert_trade_point(conn, &row))
      .await?;
    Ok(tp)
  }

  async fn get_trade_point(&self, id: Uuid) -> Result<Option<TradePoint>> {
    self
      .read(move |conn, _| queries::select_trade_point(conn, id))
      .await
  }

  async fn list_trade_points(&self) -> Result<Vec<TradePoint>> {
    self.read(|conn, _| queries::select_trade_points(conn)).await
  }

  async fn add_representative(&self, input: NewRepresentative) -> Result<Representative> {
    let rep = Representative {
      id:         Uuid::new_v4(),
      name:       input.name,
      status:     input.status,
      created_at: Utc::now(),
    };

    let row = rep.clone();
    self
      .write(move |conn, _| queries::insert_representative(conn, &row))
      .await?;
    Ok(rep)
  }

  async fn get_representative(&self, id: Uuid) -> Result<Option<Representative>> {
    self
      .read(move |conn, _| queries::select_representative(conn, id))
      .await
  }

  async fn list_representatives(&self) -> Result<Vec<Representative>> {
    self
      .read(|conn, _| queries::select_representatives(conn, None))
      .await
  }

  async fn set_representative_status(
    &self,
    id: Uuid,
    status: RepStatus,
  ) -> Result<Representative> {
    self
      .write(move |conn, _| {
        if !queries::update_representative_status(conn, id, status)? {
          return Err(fieldplan_core::Error::RepresentativeNotFound(id).into());
        }
        queries::select_representative(conn, id)?
          .ok_or_else(|| fieldplan_core::Error::RepresentativeNotFound(id).into())
      })
      .await
  }

  // ── Scheduling engine ─────────────────────────────────────────────────────

  async fn generate_monthly_plan(
    &self,
    month: Month,
    rep_ids: Option<Vec<Uuid>>,
  ) -> Result<PlanSummary> {
    self
      .write(move |conn, config| plan::generate(conn, config, month, rep_ids.as_deref()))
      .await
  }

  async fn update_visit_status(
    &self,
    visit_id: Uuid,
    update: StatusUpdate,
  ) -> Result<StatusChange> {
    self
      .write(move |conn, config| recovery::apply_status(conn, config, visit_id, update))
      .await
  }

  async fn record_disruption(&self, input: NewDisruption) -> Result<DisruptionEvent> {
    self
      .write(move |conn, config| disruption::handle(conn, config, input))
      .await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_visit(&self, visit_id: Uuid) -> Result<Option<ScheduledVisit>> {
    self
      .read(move |conn, _| queries::select_visit(conn, visit_id))
      .await
  }

  async fn get_monthly_plan(&self, month: Month, rep_id: Option<Uuid>) -> Result<MonthlyPlan> {
    self
      .read(move |conn, config| reads::monthly_plan(conn, config, month, rep_id))
      .await
  }

  async fn get_daily_plan(&self, date: NaiveDate) -> Result<Vec<DailyRoute>> {
    self
      .read(move |conn, config| reads::daily_plan(conn, config, date))
      .await
  }

  async fn list_disruptions(&self, month: Month) -> Result<Vec<DisruptionEvent>> {
    self
      .read(move |conn, _| {
        queries::select_disruptions(conn, month.first_day(), month.last_day())
      })
      .await
  }

  async fn list_visit_records(
    &self,
    month: Month,
    rep_id: Option<Uuid>,
  ) -> Result<Vec<VisitRecord>> {
    self
      .read(move |conn, _| {
        queries::select_records(conn, month.first_day(), month.last_day(), rep_id)
      })
      .await
  }

  async fn visit_stats(&self, month: Month) -> Result<VisitStats> {
    self
      .read(move |conn, _| reads::visit_stats(conn, month))
      .await
  }
}
