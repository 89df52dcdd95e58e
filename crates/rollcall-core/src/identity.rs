//! Identity — an enrolled person record.
//!
//! Identities are immutable after creation; removal is the only lifecycle
//! event, and it cascades to the attendance ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::descriptor::Descriptor;

/// An enrolled person: the unit of identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
  pub identity_id: Uuid,
  pub name:        String,
  pub descriptor:  Descriptor,
  /// Opaque reference to the enrollment photo asset, if one was kept.
  pub photo:       Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input for [`IdentityStore::add_identity`](crate::store::IdentityStore::add_identity).
/// The store assigns the id and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:       String,
  pub descriptor: Descriptor,
  pub photo:      Option<String>,
}

/// Roster row for admin listings — everything but the descriptor payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySummary {
  pub identity_id: Uuid,
  pub name:        String,
  pub photo:       Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// An `(id, descriptor)` pair — the candidate unit fed to the matcher.
#[derive(Debug, Clone)]
pub struct EnrolledDescriptor {
  pub identity_id: Uuid,
  pub descriptor:  Descriptor,
}
