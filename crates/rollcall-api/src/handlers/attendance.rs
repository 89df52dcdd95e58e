//! Admin handler for the attendance ledger.

use axum::{Json, extract::State};
use rollcall_core::{
  attendance::AttendanceRecord,
  extract::FaceExtractor,
  photos::PhotoStore,
  store::{AttendanceLedger, IdentityStore},
};

use crate::{AppState, auth::Admin, error::ApiError};

/// `GET /api/attendance` — every record with its identity's name, newest
/// first.
pub async fn list_attendance<S, X, P>(
  _admin: Admin,
  State(state): State<AppState<S, X, P>>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError>
where
  S: IdentityStore + AttendanceLedger + Clone + Send + Sync + 'static,
  X: FaceExtractor + Clone + Send + Sync + 'static,
  P: PhotoStore + Clone + Send + Sync + 'static,
{
  let records = state.store.list_events().await?;
  Ok(Json(records))
}
