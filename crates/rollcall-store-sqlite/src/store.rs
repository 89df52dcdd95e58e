//! [`SqliteStore`] — the SQLite implementation of [`IdentityStore`] and
//! [`AttendanceLedger`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rollcall_core::{
  Result,
  attendance::AttendanceRecord,
  error::Error,
  identity::{EnrolledDescriptor, Identity, IdentitySummary, NewIdentity},
  store::{AttendanceLedger, IdentityStore},
};

use crate::{
  encode::{
    RawAttendance, RawEnrolled, RawIdentity, RawSummary, descriptor_to_blob,
    encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An identity store and attendance ledger backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread, folding transport errors into the
  /// domain's storage failure.
  async fn call<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> std::result::Result<R, tokio_rusqlite::Error>
      + Send
      + 'static,
    R: Send + 'static,
  {
    self.conn.call(f).await.map_err(Error::storage)
  }
}

// ─── IdentityStore impl ──────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  async fn add_identity(&self, new: NewIdentity) -> Result<Identity> {
    if new.descriptor.is_empty() {
      return Err(Error::EmptyDescriptor);
    }

    let identity = Identity {
      identity_id: Uuid::new_v4(),
      name:        new.name,
      descriptor:  new.descriptor,
      photo:       new.photo,
      created_at:  Utc::now(),
    };

    let id_str = encode_uuid(identity.identity_id);
    let name   = identity.name.clone();
    let blob   = descriptor_to_blob(&identity.descriptor);
    let dim    = identity.descriptor.len() as i64;
    let photo  = identity.photo.clone();
    let at_str = encode_dt(identity.created_at);

    // The dimension check and the insert share a transaction, so two
    // concurrent enrollments cannot slip differently-sized descriptors
    // past each other.
    let mismatch: Option<i64> = self
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
          .query_row("SELECT dim FROM identities LIMIT 1", [], |r| r.get(0))
          .optional()?;

        if let Some(existing_dim) = existing
          && existing_dim != dim
        {
          return Ok(Some(existing_dim));
        }

        tx.execute(
          "INSERT INTO identities (identity_id, name, descriptor, dim, photo, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, blob, dim, photo, at_str],
        )?;
        tx.commit()?;
        Ok(None)
      })
      .await?;

    if let Some(expected) = mismatch {
      return Err(Error::DescriptorDimension {
        expected: expected as usize,
        found:    identity.descriptor.len(),
      });
    }

    Ok(identity)
  }

  async fn get_identity(&self, id: Uuid) -> Result<Option<Identity>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawIdentity> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT identity_id, name, descriptor, photo, created_at
               FROM identities WHERE identity_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawIdentity {
                  identity_id: row.get(0)?,
                  name:        row.get(1)?,
                  descriptor:  row.get(2)?,
                  photo:       row.get(3)?,
                  created_at:  row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  async fn list_identities(&self) -> Result<Vec<IdentitySummary>> {
    let raws: Vec<RawSummary> = self
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT identity_id, name, photo, created_at
           FROM identities ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSummary {
              identity_id: row.get(0)?,
              name:        row.get(1)?,
              photo:       row.get(2)?,
              created_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn all_descriptors(&self) -> Result<Vec<EnrolledDescriptor>> {
    // One statement on the serialised connection — the snapshot cannot
    // interleave with a concurrent enrollment or deletion.
    let raws: Vec<RawEnrolled> = self
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT identity_id, descriptor FROM identities ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawEnrolled { identity_id: row.get(0)?, descriptor: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEnrolled::into_enrolled).collect()
  }

  async fn delete_identity(&self, id: Uuid) -> Result<Option<Identity>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawIdentity> = self
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = tx
          .query_row(
            "SELECT identity_id, name, descriptor, photo, created_at
             FROM identities WHERE identity_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawIdentity {
                identity_id: row.get(0)?,
                name:        row.get(1)?,
                descriptor:  row.get(2)?,
                photo:       row.get(3)?,
                created_at:  row.get(4)?,
              })
            },
          )
          .optional()?;

        if raw.is_some() {
          // ON DELETE CASCADE removes the identity's attendance events.
          tx.execute(
            "DELETE FROM identities WHERE identity_id = ?1",
            rusqlite::params![id_str],
          )?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }
}

// ─── AttendanceLedger impl ───────────────────────────────────────────────────

impl AttendanceLedger for SqliteStore {
  async fn append_event(&self, identity_id: Uuid) -> Result<AttendanceRecord> {
    let id_str = encode_uuid(identity_id);
    let now    = Utc::now();
    let at_str = encode_dt(now);

    // Name resolution and the insert share a transaction, so a concurrent
    // identity deletion surfaces as UnknownIdentity instead of a nameless
    // or orphaned record.
    let appended: Option<(i64, String)> = self
      .call(move |conn| {
        let tx = conn.transaction()?;

        let name: Option<String> = tx
          .query_row(
            "SELECT name FROM identities WHERE identity_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        let Some(name) = name else {
          return Ok(None);
        };

        tx.execute(
          "INSERT INTO attendance_events (identity_id, recorded_at) VALUES (?1, ?2)",
          rusqlite::params![id_str, at_str],
        )?;
        let event_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some((event_id, name)))
      })
      .await?;

    let (event_id, name) =
      appended.ok_or(Error::UnknownIdentity(identity_id))?;

    Ok(AttendanceRecord { event_id, identity_id, name, recorded_at: now })
  }

  async fn list_events(&self) -> Result<Vec<AttendanceRecord>> {
    let raws: Vec<RawAttendance> = self
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT e.event_id, e.identity_id, i.name, e.recorded_at
           FROM attendance_events e
           JOIN identities i ON i.identity_id = e.identity_id
           ORDER BY e.recorded_at DESC, e.event_id DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAttendance {
              event_id:    row.get(0)?,
              identity_id: row.get(1)?,
              name:        row.get(2)?,
              recorded_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttendance::into_record).collect()
  }
}
