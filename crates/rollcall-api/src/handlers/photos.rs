//! Admin handler for enrollment photo retrieval.

use axum::{
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use rollcall_core::{
  extract::FaceExtractor,
  photos::PhotoStore,
  store::{AttendanceLedger, IdentityStore},
};

use crate::{AppState, auth::Admin, error::ApiError};

/// `GET /api/photos/{asset}` — raw image bytes for roster UIs.
///
/// Malformed or traversal-shaped references resolve like any other
/// unknown asset: 404.
pub async fn get_photo<S, X, P>(
  _admin: Admin,
  State(state): State<AppState<S, X, P>>,
  Path(asset): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IdentityStore + AttendanceLedger + Clone + Send + Sync + 'static,
  X: FaceExtractor + Clone + Send + Sync + 'static,
  P: PhotoStore + Clone + Send + Sync + 'static,
{
  let bytes = state
    .photos
    .load(&asset)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("photo {asset} not found")))?;

  Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}
