//! The `IdentityStore` and `AttendanceLedger` traits.
//!
//! Both traits are implemented by one storage backend (e.g.
//! `rollcall-store-sqlite`), so the ledger's referential check and the
//! identity-deletion cascade share a transaction boundary. Higher layers
//! depend on these abstractions, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  attendance::AttendanceRecord,
  error::Error,
  identity::{EnrolledDescriptor, Identity, IdentitySummary, NewIdentity},
};

// ─── Identity store ──────────────────────────────────────────────────────────

/// Abstraction over durable identity records. The store is the sole
/// writer of identities; records are immutable between creation and
/// deletion.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait IdentityStore: Send + Sync {
  /// Persist a new identity atomically and return it with its assigned
  /// id and creation timestamp.
  ///
  /// Fails with [`Error::EmptyDescriptor`] for a zero-length descriptor,
  /// and with [`Error::DescriptorDimension`] when the length disagrees
  /// with the already-enrolled population.
  fn add_identity(
    &self,
    new: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Error>> + Send + '_;

  /// Retrieve one identity by id. `None` if not found.
  fn get_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Error>> + Send + '_;

  /// All identities in insertion order, without descriptor payloads.
  fn list_identities(
    &self,
  ) -> impl Future<Output = Result<Vec<IdentitySummary>, Error>> + Send + '_;

  /// A consistent snapshot of every `(id, descriptor)` pair, taken in a
  /// single read so concurrent writes cannot tear it.
  fn all_descriptors(
    &self,
  ) -> impl Future<Output = Result<Vec<EnrolledDescriptor>, Error>> + Send + '_;

  /// Delete an identity and, in the same transaction, all of its
  /// attendance records. Returns the deleted identity so the caller can
  /// release its photo asset, or `None` if no record existed.
  fn delete_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Error>> + Send + '_;
}

// ─── Attendance ledger ───────────────────────────────────────────────────────

/// Abstraction over the append-only attendance ledger. Nothing updates
/// or deletes records except the identity-deletion cascade.
pub trait AttendanceLedger: Send + Sync {
  /// Append a sign-in event for `identity_id`, resolving the display
  /// name in the same transaction.
  ///
  /// Fails with [`Error::UnknownIdentity`] when the identity does not
  /// exist — including when it was deleted between matching and append.
  fn append_event(
    &self,
    identity_id: Uuid,
  ) -> impl Future<Output = Result<AttendanceRecord, Error>> + Send + '_;

  /// Every record joined with its identity's name, newest first; ties on
  /// timestamp break toward the higher event id.
  fn list_events(
    &self,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Error>> + Send + '_;
}
