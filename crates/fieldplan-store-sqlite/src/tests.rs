//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use fieldplan_core::{
  capacity::SchedulingConfig,
  disruption::{DisruptionKind, NewDisruption},
  period::Month,
  policy::Category,
  registry::{NewRepresentative, NewTradePoint, RepStatus, Representative, TradePoint},
  store::ScheduleStore,
  visit::{PlannedVisitView, StatusUpdate, VisitStatus},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn store_with(config: SchedulingConfig) -> SqliteStore {
  store().await.with_scheduling(config)
}

fn capacity(n: u32) -> SchedulingConfig {
  SchedulingConfig { daily_capacity_override: Some(n), ..Default::default() }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn feb() -> Month { Month::new(2026, 2).unwrap() }

async fn rep(s: &SqliteStore, name: &str) -> Representative {
  s.add_representative(NewRepresentative::active(name))
    .await
    .unwrap()
}

async fn trade_points(s: &SqliteStore, category: Category, n: usize) -> Vec<TradePoint> {
  let mut out = Vec::with_capacity(n);
  for i in 0..n {
    let tp = s
      .add_trade_point(NewTradePoint::new(format!("{category}-{i}"), category))
      .await
      .unwrap();
    out.push(tp);
  }
  out
}

async fn visits_on(s: &SqliteStore, day: NaiveDate) -> Vec<PlannedVisitView> {
  s.get_daily_plan(day)
    .await
    .unwrap()
    .into_iter()
    .flat_map(|route| route.visits)
    .collect()
}

/// Every (representative, date) of `month` holds at most `limit` open visits.
async fn assert_within_capacity(s: &SqliteStore, month: Month, limit: usize) {
  let plan = s.get_monthly_plan(month, None).await.unwrap();
  for route in plan.routes {
    let open = route.visits.iter().filter(|v| v.status.occupies_slot()).count();
    assert!(
      open <= limit,
      "{} has {open} open visits on {}",
      route.rep_name,
      route.date
    );
  }
}

// ─── Registries ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn registries_round_trip() {
  let s = store().await;
  let tp = s
    .add_trade_point(NewTradePoint {
      name:     "Corner shop".into(),
      category: Some(Category::B),
      city:     Some("Kazan".into()),
      district: None,
    })
    .await
    .unwrap();
  let fetched = s.get_trade_point(tp.id).await.unwrap().unwrap();
  assert_eq!(fetched.category, Some(Category::B));
  assert_eq!(fetched.city.as_deref(), Some("Kazan"));
  assert!(s.get_trade_point(Uuid::new_v4()).await.unwrap().is_none());

  let a = rep(&s, "Anna").await;
  let b = rep(&s, "Boris").await;
  let names: Vec<String> = s
    .list_representatives()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.name)
    .collect();
  assert_eq!(names, vec!["Anna", "Boris"]);

  let updated = s.set_representative_status(b.id, RepStatus::Vacation).await.unwrap();
  assert_eq!(updated.status, RepStatus::Vacation);
  assert!(s.get_representative(a.id).await.unwrap().unwrap().is_active());
}

#[tokio::test]
async fn status_change_for_unknown_representative_fails() {
  let s = store().await;
  let err = s
    .set_representative_status(Uuid::new_v4(), RepStatus::Sick)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(fieldplan_core::Error::RepresentativeNotFound(_))));
}

// ─── Plan generation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn category_a_gets_three_weekly_visits() {
  let s = store().await;
  let r = rep(&s, "Anna").await;
  let tp = trade_points(&s, Category::A, 1).await.remove(0);

  let summary = s.generate_monthly_plan(feb(), None).await.unwrap();
  assert_eq!(summary.total_visits_planned, 3);
  assert_eq!(summary.total_trade_points_planned, 1);
  assert_eq!(summary.coverage_pct, 100.0);
  assert_eq!(summary.representative_count, 1);
  assert_eq!(summary.unassigned_tasks, 0);

  let plan = s.get_monthly_plan(feb(), None).await.unwrap();
  let dates: Vec<NaiveDate> = plan.routes.iter().map(|r| r.date).collect();
  assert_eq!(dates, vec![date(2026, 2, 2), date(2026, 2, 9), date(2026, 2, 16)]);
  for route in &plan.routes {
    assert_eq!(route.rep_id, r.id);
    assert_eq!(route.visits[0].trade_point_id, tp.id);
    assert_eq!(route.visits[0].status, VisitStatus::Planned);
    assert_eq!(route.estimated_duration_hours, 0.58);
  }
}

#[tokio::test]
async fn category_d_only_in_quarter_start_month() {
  let s = store().await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::D, 1).await;

  let jan = Month::new(2026, 1).unwrap();
  let summary = s.generate_monthly_plan(jan, None).await.unwrap();
  assert_eq!(summary.total_visits_planned, 1);
  assert_eq!(visits_on(&s, date(2026, 1, 1)).await.len(), 1);

  let summary = s.generate_monthly_plan(feb(), None).await.unwrap();
  assert_eq!(summary.total_visits_planned, 0);
  assert_eq!(summary.coverage_pct, 0.0);
}

#[tokio::test]
async fn uncategorised_trade_points_are_not_scheduled() {
  let s = store().await;
  rep(&s, "Anna").await;
  s.add_trade_point(NewTradePoint { name: "unknown".into(), ..Default::default() })
    .await
    .unwrap();

  let err = s.generate_monthly_plan(feb(), None).await.unwrap_err();
  assert!(matches!(err, Error::Core(fieldplan_core::Error::NoEligibleTradePoints)));

  trade_points(&s, Category::C, 1).await;
  let summary = s.generate_monthly_plan(feb(), None).await.unwrap();
  assert_eq!(summary.total_trade_points, 1);
  assert_eq!(summary.total_visits_planned, 1);
}

#[tokio::test]
async fn generation_needs_active_representatives() {
  let s = store().await;
  trade_points(&s, Category::A, 1).await;

  let err = s.generate_monthly_plan(feb(), None).await.unwrap_err();
  assert!(matches!(err, Error::Core(fieldplan_core::Error::NoEligibleRepresentatives)));

  let r = rep(&s, "Anna").await;
  let err = s
    .generate_monthly_plan(feb(), Some(vec![Uuid::new_v4()]))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(fieldplan_core::Error::NoEligibleRepresentatives)));

  s.set_representative_status(r.id, RepStatus::Sick).await.unwrap();
  let err = s.generate_monthly_plan(feb(), None).await.unwrap_err();
  assert!(matches!(err, Error::Core(fieldplan_core::Error::NoEligibleRepresentatives)));
}

#[tokio::test]
async fn rep_filter_limits_assignments() {
  let s = store().await;
  let a = rep(&s, "Anna").await;
  rep(&s, "Boris").await;
  trade_points(&s, Category::C, 4).await;

  let summary = s
    .generate_monthly_plan(feb(), Some(vec![a.id]))
    .await
    .unwrap();
  assert_eq!(summary.representative_count, 1);

  let plan = s.get_monthly_plan(feb(), None).await.unwrap();
  assert!(plan.routes.iter().all(|r| r.rep_id == a.id));
}

#[tokio::test]
async fn regeneration_is_idempotent() {
  let s = store().await;
  rep(&s, "Anna").await;
  rep(&s, "Boris").await;
  trade_points(&s, Category::A, 3).await;
  trade_points(&s, Category::B, 4).await;
  trade_points(&s, Category::C, 5).await;

  let first = s.generate_monthly_plan(feb(), None).await.unwrap();
  let second = s.generate_monthly_plan(feb(), None).await.unwrap();
  assert_eq!(first, second);

  let plan = s.get_monthly_plan(feb(), None).await.unwrap();
  let total: usize = plan.routes.iter().map(|r| r.total).sum();
  assert_eq!(total, second.total_visits_planned);
  assert_eq!(plan.coverage_pct, 100.0);
}

#[tokio::test]
async fn regeneration_replaces_rows_spilled_into_next_month() {
  let s = store_with(capacity(1)).await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::C, 12).await;
  let march = Month::new(2026, 3).unwrap();

  let mut spilled = Vec::new();
  for _ in 0..3 {
    let summary = s.generate_monthly_plan(feb(), None).await.unwrap();
    assert_eq!(summary.total_visits_planned, 12);
    let ids: Vec<Uuid> = s
      .get_monthly_plan(march, None)
      .await
      .unwrap()
      .routes
      .into_iter()
      .flat_map(|route| route.visits)
      .map(|v| v.trade_point_id)
      .collect();
    spilled.push(ids);
  }

  // Feb 16 through Feb 27 holds ten visits; the other two land on Mar 2 and 3.
  assert!(spilled.iter().all(|ids| ids.len() == 2), "{spilled:?}");
  assert_eq!(visits_on(&s, date(2026, 3, 2)).await.len(), 1);
  assert_eq!(visits_on(&s, date(2026, 3, 3)).await.len(), 1);
  assert_within_capacity(&s, march, 1).await;
}

#[tokio::test]
async fn regenerating_next_month_replaces_earlier_spill() {
  let s = store_with(capacity(1)).await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::C, 12).await;
  let march = Month::new(2026, 3).unwrap();

  s.generate_monthly_plan(feb(), None).await.unwrap();
  s.generate_monthly_plan(feb(), None).await.unwrap();
  let before = s.get_monthly_plan(march, None).await.unwrap();
  assert_eq!(before.routes.iter().map(|r| r.total).sum::<usize>(), 2);

  // March's own run replaces everything dated in March, spill included.
  s.generate_monthly_plan(march, None).await.unwrap();
  assert_within_capacity(&s, march, 1).await;
  let feb_plan = s.get_monthly_plan(feb(), None).await.unwrap();
  assert_eq!(feb_plan.routes.iter().map(|r| r.total).sum::<usize>(), 10);
}

#[tokio::test]
async fn overflow_spills_without_overbooking() {
  let s = store_with(capacity(2)).await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::A, 5).await;

  let summary = s.generate_monthly_plan(feb(), None).await.unwrap();
  assert_eq!(summary.total_visits_planned, 15);
  assert_eq!(visits_on(&s, date(2026, 2, 2)).await.len(), 2);
  assert_eq!(visits_on(&s, date(2026, 2, 3)).await.len(), 2);
  assert_eq!(visits_on(&s, date(2026, 2, 4)).await.len(), 1);
  assert_within_capacity(&s, feb(), 2).await;
}

// ─── Status updates and skip recovery ────────────────────────────────────────

#[tokio::test]
async fn skipped_visit_moves_to_next_free_day() {
  let s = store_with(capacity(4)).await;
  let r = rep(&s, "Anna").await;
  trade_points(&s, Category::A, 13).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();

  let on_fifth = visits_on(&s, date(2026, 2, 5)).await;
  assert_eq!(on_fifth.len(), 1);
  assert!(visits_on(&s, date(2026, 2, 6)).await.is_empty());

  let change = s
    .update_visit_status(on_fifth[0].id, StatusUpdate::to(VisitStatus::Skipped))
    .await
    .unwrap();
  assert_eq!(change.visit.status, VisitStatus::Skipped);
  assert!(change.visit_record.is_none());

  let follow_up = change.follow_up.expect("follow-up visit");
  assert_eq!(follow_up.status, VisitStatus::Rescheduled);
  assert_eq!(follow_up.rep_id, r.id);
  assert_eq!(follow_up.trade_point_id, on_fifth[0].trade_point_id);
  assert_eq!(follow_up.planned_date, date(2026, 2, 6));

  let stored = s.get_visit(on_fifth[0].id).await.unwrap().unwrap();
  assert_eq!(stored.status, VisitStatus::Skipped);
  assert_eq!(stored.planned_date, date(2026, 2, 5));
}

#[tokio::test]
async fn skip_falls_back_to_other_active_rep() {
  let s = store().await;
  let anna = rep(&s, "Anna").await;
  let boris = rep(&s, "Boris").await;
  trade_points(&s, Category::A, 1).await;
  s.generate_monthly_plan(feb(), Some(vec![anna.id])).await.unwrap();
  s.set_representative_status(anna.id, RepStatus::Vacation).await.unwrap();

  let visit = visits_on(&s, date(2026, 2, 2)).await.remove(0);
  let change = s
    .update_visit_status(visit.id, StatusUpdate::to(VisitStatus::Skipped))
    .await
    .unwrap();
  let follow_up = change.follow_up.expect("follow-up visit");
  assert_eq!(follow_up.rep_id, boris.id);
  assert_eq!(follow_up.planned_date, date(2026, 2, 3));
}

#[tokio::test]
async fn skip_falls_back_when_same_rep_is_full() {
  let s = store_with(SchedulingConfig {
    daily_capacity_override: Some(1),
    recovery_lookahead_days: 1,
    ..Default::default()
  })
  .await;
  let anna = rep(&s, "Anna").await;
  let boris = rep(&s, "Boris").await;
  trade_points(&s, Category::A, 2).await;
  s.generate_monthly_plan(feb(), Some(vec![anna.id])).await.unwrap();

  let next_day = visits_on(&s, date(2026, 2, 3)).await;
  assert_eq!(next_day.len(), 1);
  assert_eq!(next_day[0].rep_id, anna.id);

  let visit = visits_on(&s, date(2026, 2, 2)).await.remove(0);
  let change = s
    .update_visit_status(visit.id, StatusUpdate::to(VisitStatus::Skipped))
    .await
    .unwrap();
  let follow_up = change.follow_up.expect("follow-up visit");
  assert_eq!(follow_up.rep_id, boris.id);
  assert_eq!(follow_up.planned_date, date(2026, 2, 3));
  assert_eq!(follow_up.trade_point_id, visit.trade_point_id);
  assert!(s.get_representative(anna.id).await.unwrap().unwrap().is_active());
}

#[tokio::test]
async fn skip_without_free_slot_leaves_gap() {
  let s = store_with(SchedulingConfig {
    daily_capacity_override: Some(1),
    recovery_lookahead_days: 2,
    ..Default::default()
  })
  .await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::A, 5).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();

  let visit = visits_on(&s, date(2026, 2, 2)).await.remove(0);
  let change = s
    .update_visit_status(visit.id, StatusUpdate::to(VisitStatus::Skipped))
    .await
    .unwrap();
  assert_eq!(change.visit.status, VisitStatus::Skipped);
  assert!(change.follow_up.is_none());
  assert_within_capacity(&s, feb(), 1).await;
}

#[tokio::test]
async fn completion_creates_and_then_updates_one_record() {
  let s = store().await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::A, 1).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();
  let visit = visits_on(&s, date(2026, 2, 2)).await.remove(0);

  let change = s
    .update_visit_status(visit.id, StatusUpdate {
      status:   VisitStatus::Completed,
      time_in:  NaiveTime::from_hms_opt(10, 0, 0),
      time_out: None,
      notes:    Some("shelf restocked".into()),
    })
    .await
    .unwrap();
  let record = change.visit_record.expect("visit record");
  assert_eq!(record.schedule_id, Some(visit.id));
  assert_eq!(record.visited_date, date(2026, 2, 2));

  let again = s
    .update_visit_status(visit.id, StatusUpdate {
      status:   VisitStatus::Completed,
      time_in:  None,
      time_out: NaiveTime::from_hms_opt(10, 20, 0),
      notes:    None,
    })
    .await
    .unwrap()
    .visit_record
    .unwrap();
  assert_eq!(again.id, record.id);
  assert_eq!(again.time_in, NaiveTime::from_hms_opt(10, 0, 0));
  assert_eq!(again.time_out, NaiveTime::from_hms_opt(10, 20, 0));
  assert_eq!(again.notes.as_deref(), Some("shelf restocked"));

  let records = s.list_visit_records(feb(), None).await.unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0], again);
}

#[tokio::test]
async fn completion_times_keep_sub_second_precision() {
  let s = store().await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::A, 1).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();
  let visit = visits_on(&s, date(2026, 2, 2)).await.remove(0);

  let record = s
    .update_visit_status(visit.id, StatusUpdate {
      status:   VisitStatus::Completed,
      time_in:  NaiveTime::from_hms_milli_opt(9, 30, 15, 500),
      time_out: NaiveTime::from_hms_micro_opt(9, 52, 0, 123_456),
      notes:    None,
    })
    .await
    .unwrap()
    .visit_record
    .unwrap();

  let records = s.list_visit_records(feb(), None).await.unwrap();
  assert_eq!(records, vec![record]);
}

#[tokio::test]
async fn invalid_transitions_are_rejected() {
  let s = store().await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::A, 1).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();
  let visit = visits_on(&s, date(2026, 2, 2)).await.remove(0);

  let err = s
    .update_visit_status(visit.id, StatusUpdate::to(VisitStatus::Rescheduled))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(fieldplan_core::Error::InvalidTransition {
      from: VisitStatus::Planned,
      to:   VisitStatus::Rescheduled,
    })
  ));

  s.update_visit_status(visit.id, StatusUpdate::to(VisitStatus::Cancelled))
    .await
    .unwrap();
  let err = s
    .update_visit_status(visit.id, StatusUpdate::to(VisitStatus::Completed))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(fieldplan_core::Error::InvalidTransition { .. })));

  let err = s
    .update_visit_status(Uuid::new_v4(), StatusUpdate::to(VisitStatus::Completed))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(fieldplan_core::Error::VisitNotFound(_))));
}

#[tokio::test]
async fn regeneration_keeps_visit_history() {
  let s = store().await;
  rep(&s, "Anna").await;
  trade_points(&s, Category::A, 1).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();
  let visit = visits_on(&s, date(2026, 2, 2)).await.remove(0);
  s.update_visit_status(visit.id, StatusUpdate::to(VisitStatus::Completed))
    .await
    .unwrap();

  s.generate_monthly_plan(feb(), None).await.unwrap();
  assert!(s.get_visit(visit.id).await.unwrap().is_none());

  let records = s.list_visit_records(feb(), None).await.unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].schedule_id, None);
}

// ─── Disruptions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn illness_splits_day_round_robin() {
  let s = store_with(capacity(5)).await;
  let r1 = rep(&s, "R1").await;
  let r2 = rep(&s, "R2").await;
  let r3 = rep(&s, "R3").await;
  trade_points(&s, Category::A, 10).await;
  s.generate_monthly_plan(feb(), Some(vec![r1.id])).await.unwrap();

  let day = date(2026, 2, 10);
  let before = visits_on(&s, day).await;
  assert_eq!(before.len(), 5);
  let affected: HashSet<Uuid> = before.iter().map(|v| v.trade_point_id).collect();

  let event = s
    .record_disruption(NewDisruption {
      rep_id:      r1.id,
      event_date:  day,
      kind:        DisruptionKind::Illness,
      description: Some("flu".into()),
    })
    .await
    .unwrap();

  assert_eq!(event.rep_name, "R1");
  assert_eq!(event.affected_count, 5);
  assert_eq!(event.redistributed_to.len(), 2);
  assert_eq!(event.redistributed_to[0].rep_id, r2.id);
  assert_eq!(event.redistributed_to[0].trade_point_ids.len(), 3);
  assert_eq!(event.redistributed_to[1].rep_id, r3.id);
  assert_eq!(event.redistributed_to[1].trade_point_ids.len(), 2);
  assert!(event.redistributed_to.iter().all(|r| r.new_date == date(2026, 2, 11)));
  assert!(event.unredistributed_trade_point_ids.is_empty());

  let moved: HashSet<Uuid> = event
    .redistributed_to
    .iter()
    .flat_map(|r| r.trade_point_ids.iter().copied())
    .collect();
  assert_eq!(moved, affected);

  assert!(
    visits_on(&s, day)
      .await
      .iter()
      .all(|v| v.status == VisitStatus::Cancelled)
  );
  let next_day = visits_on(&s, date(2026, 2, 11)).await;
  let rescheduled = next_day
    .iter()
    .filter(|v| v.status == VisitStatus::Rescheduled)
    .count();
  assert_eq!(rescheduled, 5);

  let sick = s.get_representative(r1.id).await.unwrap().unwrap();
  assert_eq!(sick.status, RepStatus::Sick);
  assert_within_capacity(&s, feb(), 5).await;
}

#[tokio::test]
async fn disruption_without_peers_cancels_everything() {
  let s = store().await;
  let r1 = rep(&s, "R1").await;
  trade_points(&s, Category::A, 3).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();

  let event = s
    .record_disruption(NewDisruption {
      rep_id:      r1.id,
      event_date:  date(2026, 2, 2),
      kind:        DisruptionKind::Weather,
      description: None,
    })
    .await
    .unwrap();

  assert_eq!(event.affected_count, 3);
  assert!(event.redistributed_to.is_empty());
  assert_eq!(
    event.unredistributed_trade_point_ids,
    event.affected_trade_point_ids
  );
  assert!(
    visits_on(&s, date(2026, 2, 2))
      .await
      .iter()
      .all(|v| v.status == VisitStatus::Cancelled)
  );

  let history = s.list_disruptions(feb()).await.unwrap();
  assert_eq!(history, vec![event]);
  let r1 = s.get_representative(r1.id).await.unwrap().unwrap();
  assert_eq!(r1.status, RepStatus::Active);
}

#[tokio::test]
async fn redistribution_spills_instead_of_overbooking() {
  let s = store_with(capacity(2)).await;
  let first = rep(&s, "First").await;
  let second = rep(&s, "Second").await;
  trade_points(&s, Category::A, 5).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();
  assert_eq!(visits_on(&s, date(2026, 2, 3)).await.len(), 1);

  let event = s
    .record_disruption(NewDisruption {
      rep_id:      second.id,
      event_date:  date(2026, 2, 2),
      kind:        DisruptionKind::VehicleBreakdown,
      description: None,
    })
    .await
    .unwrap();

  assert_eq!(event.affected_count, 2);
  let days: Vec<(Uuid, NaiveDate, usize)> = event
    .redistributed_to
    .iter()
    .map(|r| (r.rep_id, r.new_date, r.trade_point_ids.len()))
    .collect();
  assert_eq!(days, vec![
    (first.id, date(2026, 2, 3), 1),
    (first.id, date(2026, 2, 4), 1),
  ]);
  assert_eq!(
    event.redistributed_count() + event.unredistributed_trade_point_ids.len(),
    event.affected_count
  );
  assert_within_capacity(&s, feb(), 2).await;
}

#[tokio::test]
async fn disruption_for_unknown_rep_is_rejected() {
  let s = store().await;
  let err = s
    .record_disruption(NewDisruption {
      rep_id:      Uuid::new_v4(),
      event_date:  date(2026, 2, 2),
      kind:        DisruptionKind::Other,
      description: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(fieldplan_core::Error::RepresentativeNotFound(_))));
  assert!(s.list_disruptions(feb()).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_day_is_still_audited() {
  let s = store().await;
  let r1 = rep(&s, "R1").await;
  rep(&s, "R2").await;

  let later = s
    .record_disruption(NewDisruption {
      rep_id:      r1.id,
      event_date:  date(2026, 2, 20),
      kind:        DisruptionKind::Weather,
      description: None,
    })
    .await
    .unwrap();
  let earlier = s
    .record_disruption(NewDisruption {
      rep_id:      r1.id,
      event_date:  date(2026, 2, 3),
      kind:        DisruptionKind::Illness,
      description: Some("fever".into()),
    })
    .await
    .unwrap();
  assert_eq!(earlier.affected_count, 0);
  assert!(earlier.redistributed_to.is_empty());

  let history = s.list_disruptions(feb()).await.unwrap();
  let ids: Vec<Uuid> = history.iter().map(|e| e.id).collect();
  assert_eq!(ids, vec![earlier.id, later.id]);
  assert!(s.list_disruptions(Month::new(2026, 3).unwrap()).await.unwrap().is_empty());

  let r1 = s.get_representative(r1.id).await.unwrap().unwrap();
  assert_eq!(r1.status, RepStatus::Sick);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn visit_stats_group_completed_visits() {
  let s = store().await;
  let anna = rep(&s, "Anna").await;
  trade_points(&s, Category::A, 1).await;
  trade_points(&s, Category::C, 1).await;
  s.generate_monthly_plan(feb(), None).await.unwrap();

  for day in [date(2026, 2, 2), date(2026, 2, 9), date(2026, 2, 16)] {
    for visit in visits_on(&s, day).await {
      s.update_visit_status(visit.id, StatusUpdate::to(VisitStatus::Completed))
        .await
        .unwrap();
    }
  }

  let stats = s.visit_stats(feb()).await.unwrap();
  assert_eq!(stats.total_visits, 4);
  assert_eq!(stats.unique_trade_points, 2);
  assert_eq!(stats.unique_representatives, 1);
  assert_eq!(stats.by_category.get("A"), Some(&3));
  assert_eq!(stats.by_category.get("C"), Some(&1));
  assert_eq!(stats.by_representative[0].rep_id, anna.id);
  assert_eq!(stats.by_representative[0].unique_trade_points, 2);

  let plan = s.get_monthly_plan(feb(), Some(anna.id)).await.unwrap();
  assert_eq!(plan.total_trade_points_planned, 2);
  assert_eq!(plan.coverage_pct, 100.0);
}
