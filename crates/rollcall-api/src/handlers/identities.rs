//! Admin handlers for the identity roster.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use rollcall_core::{
  extract::FaceExtractor,
  identity::IdentitySummary,
  photos::PhotoStore,
  store::{AttendanceLedger, IdentityStore},
};
use uuid::Uuid;

use crate::{AppState, auth::Admin, error::ApiError};

/// `GET /api/identities` — the full roster, insertion-ordered.
pub async fn list_identities<S, X, P>(
  _admin: Admin,
  State(state): State<AppState<S, X, P>>,
) -> Result<Json<Vec<IdentitySummary>>, ApiError>
where
  S: IdentityStore + AttendanceLedger + Clone + Send + Sync + 'static,
  X: FaceExtractor + Clone + Send + Sync + 'static,
  P: PhotoStore + Clone + Send + Sync + 'static,
{
  let summaries = state.store.list_identities().await?;
  Ok(Json(summaries))
}

/// `DELETE /api/identities/{id}` — remove an identity, its attendance
/// records, and its photo asset.
pub async fn delete_identity<S, X, P>(
  _admin: Admin,
  State(state): State<AppState<S, X, P>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: IdentityStore + AttendanceLedger + Clone + Send + Sync + 'static,
  X: FaceExtractor + Clone + Send + Sync + 'static,
  P: PhotoStore + Clone + Send + Sync + 'static,
{
  if state.pipeline.remove_identity(id).await? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("identity {id} not found")))
  }
}
