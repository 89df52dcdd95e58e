//! SQL schema for the rollcall SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS identities (
    identity_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    descriptor  BLOB NOT NULL,   -- little-endian f32 components
    dim         INTEGER NOT NULL,-- component count; equal across all rows
    photo       TEXT,            -- opaque photo asset reference, or NULL
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Attendance events are strictly append-only.
-- The only DELETE ever issued is the identity-deletion cascade.
CREATE TABLE IF NOT EXISTS attendance_events (
    event_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    identity_id TEXT NOT NULL REFERENCES identities(identity_id)
                ON DELETE CASCADE,
    recorded_at TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS attendance_identity_idx ON attendance_events(identity_id);
CREATE INDEX IF NOT EXISTS attendance_recorded_idx ON attendance_events(recorded_at);

PRAGMA user_version = 1;
";
