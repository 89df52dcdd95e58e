//! `POST /api/signin` — public kiosk sign-in endpoint.
//!
//! Accepts `multipart/form-data` with a single `photo` file field. On a
//! match, responds 200 with the identity and the recorded timestamp; on
//! no match, 404 with nothing recorded.

use axum::{
  Json,
  extract::{Multipart, State},
};
use bytes::Bytes;
use rollcall_core::{
  extract::FaceExtractor,
  photos::PhotoStore,
  store::{AttendanceLedger, IdentityStore},
};
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

async fn read_photo(mut multipart: Multipart) -> Result<Bytes, ApiError> {
  let mut photo: Option<Bytes> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
  {
    if field.name() == Some("photo") {
      let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("reading photo field: {e}")))?;
      photo = Some(bytes);
    }
  }

  photo.ok_or_else(|| ApiError::BadRequest("missing photo file".to_string()))
}

/// `POST /api/signin`
pub async fn signin<S, X, P>(
  State(state): State<AppState<S, X, P>>,
  multipart: Multipart,
) -> Result<Json<Value>, ApiError>
where
  S: IdentityStore + AttendanceLedger + Clone + Send + Sync + 'static,
  X: FaceExtractor + Clone + Send + Sync + 'static,
  P: PhotoStore + Clone + Send + Sync + 'static,
{
  let photo = read_photo(multipart).await?;
  let record = state.pipeline.sign_in(photo).await?;

  Ok(Json(json!({
    "id": record.identity_id,
    "name": record.name,
    "timestamp": record.recorded_at,
  })))
}
