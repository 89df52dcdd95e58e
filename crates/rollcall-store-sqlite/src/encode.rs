//! Encoding and decoding helpers between Rust domain types and their
//! SQLite column representations.
//!
//! All timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings. Descriptors are stored as BLOBs of little-endian
//! f32 components, with the component count mirrored in a `dim` column.

use chrono::{DateTime, Utc};
use rollcall_core::{
  Result,
  attendance::AttendanceRecord,
  descriptor::Descriptor,
  error::Error,
  identity::{EnrolledDescriptor, Identity, IdentitySummary},
};
use uuid::Uuid;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(Error::storage)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(Error::storage)
}

// ─── Descriptor ──────────────────────────────────────────────────────────────

/// Descriptor → BLOB of little-endian f32 components.
pub fn descriptor_to_blob(d: &Descriptor) -> Vec<u8> {
  let mut blob = Vec::with_capacity(d.len() * 4);
  for v in d.as_slice() {
    blob.extend_from_slice(&v.to_le_bytes());
  }
  blob
}

/// BLOB → Descriptor. The length must be a whole number of f32s.
pub fn descriptor_from_blob(blob: &[u8]) -> Result<Descriptor> {
  if blob.len() % 4 != 0 {
    return Err(Error::Storage(
      format!("descriptor blob length {} is not a multiple of 4", blob.len()).into(),
    ));
  }

  let values = blob
    .chunks_exact(4)
    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    .collect();
  Ok(Descriptor::new(values))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id: String,
  pub name:        String,
  pub descriptor:  Vec<u8>,
  pub photo:       Option<String>,
  pub created_at:  String,
}

impl RawIdentity {
  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      identity_id: decode_uuid(&self.identity_id)?,
      name:        self.name,
      descriptor:  descriptor_from_blob(&self.descriptor)?,
      photo:       self.photo,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw columns for a roster listing — no descriptor payload.
pub struct RawSummary {
  pub identity_id: String,
  pub name:        String,
  pub photo:       Option<String>,
  pub created_at:  String,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<IdentitySummary> {
    Ok(IdentitySummary {
      identity_id: decode_uuid(&self.identity_id)?,
      name:        self.name,
      photo:       self.photo,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw `(identity_id, descriptor)` pair for the matcher snapshot.
pub struct RawEnrolled {
  pub identity_id: String,
  pub descriptor:  Vec<u8>,
}

impl RawEnrolled {
  pub fn into_enrolled(self) -> Result<EnrolledDescriptor> {
    Ok(EnrolledDescriptor {
      identity_id: decode_uuid(&self.identity_id)?,
      descriptor:  descriptor_from_blob(&self.descriptor)?,
    })
  }
}

/// Raw columns from an `attendance_events` row joined with `identities`.
pub struct RawAttendance {
  pub event_id:    i64,
  pub identity_id: String,
  pub name:        String,
  pub recorded_at: String,
}

impl RawAttendance {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      event_id:    self.event_id,
      identity_id: decode_uuid(&self.identity_id)?,
      name:        self.name,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
