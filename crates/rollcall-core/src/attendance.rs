//! Attendance records — rows of the append-only sign-in ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One successful sign-in, joined with the identity's display name.
///
/// Records are never updated. They disappear only when their identity is
/// deleted, via the store's cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
  /// Ledger-assigned sequence number, strictly increasing per store.
  pub event_id:    i64,
  pub identity_id: Uuid,
  /// Display name resolved in the same transaction as the append, so a
  /// concurrent identity deletion cannot leave a nameless record.
  pub name:        String,
  pub recorded_at: DateTime<Utc>,
}
