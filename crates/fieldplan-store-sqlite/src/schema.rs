//! SQL schema for the scheduler's SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Registry order is insertion order (rowid).
CREATE TABLE IF NOT EXISTS trade_points (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    category    TEXT CHECK (category IN ('A', 'B', 'C', 'D')),
    city        TEXT,
    district    TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS representatives (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'active',   -- active | sick | vacation | unavailable
    created_at  TEXT NOT NULL
);

-- Rows are replaced wholesale per month by plan generation and otherwise
-- only change status. A new date always means a new row. `plan_month` is set
-- on rows a generation run created, including those spilled past month end.
CREATE TABLE IF NOT EXISTS scheduled_visits (
    id              TEXT PRIMARY KEY,
    trade_point_id  TEXT NOT NULL REFERENCES trade_points(id),
    rep_id          TEXT NOT NULL REFERENCES representatives(id) ON DELETE CASCADE,
    planned_date    TEXT NOT NULL,   -- YYYY-MM-DD
    status          TEXT NOT NULL
                    CHECK (status IN ('planned', 'completed', 'skipped', 'rescheduled', 'cancelled')),
    plan_month      TEXT,            -- YYYY-MM
    created_at      TEXT NOT NULL
);

-- Never deleted by the engine; losing the schedule row only clears the link.
CREATE TABLE IF NOT EXISTS visit_records (
    id              TEXT PRIMARY KEY,
    schedule_id     TEXT UNIQUE REFERENCES scheduled_visits(id) ON DELETE SET NULL,
    trade_point_id  TEXT NOT NULL REFERENCES trade_points(id),
    rep_id          TEXT NOT NULL REFERENCES representatives(id) ON DELETE CASCADE,
    visited_date    TEXT NOT NULL,
    time_in         TEXT,            -- HH:MM:SS[.fff]
    time_out        TEXT,
    notes           TEXT,
    created_at      TEXT NOT NULL
);

-- Append-only audit log of disruption handling runs.
CREATE TABLE IF NOT EXISTS disruption_events (
    id                  TEXT PRIMARY KEY,
    kind                TEXT NOT NULL,   -- illness | weather | vehicle_breakdown | other
    rep_id              TEXT NOT NULL REFERENCES representatives(id) ON DELETE CASCADE,
    event_date          TEXT NOT NULL,
    description         TEXT,
    affected_json       TEXT NOT NULL DEFAULT '[]',
    redistribution_json TEXT NOT NULL DEFAULT '[]',
    unplaced_json       TEXT NOT NULL DEFAULT '[]',
    created_at          TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS visits_date_idx     ON scheduled_visits(planned_date);
CREATE INDEX IF NOT EXISTS visits_rep_day_idx  ON scheduled_visits(rep_id, planned_date, status);
CREATE INDEX IF NOT EXISTS visits_plan_idx     ON scheduled_visits(plan_month);
CREATE INDEX IF NOT EXISTS records_date_idx    ON visit_records(visited_date);
CREATE INDEX IF NOT EXISTS disruptions_date_idx ON disruption_events(event_date);

PRAGMA user_version = 1;
";
