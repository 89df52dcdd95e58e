//! `POST /api/enroll` — public enrollment endpoint.
//!
//! Accepts `multipart/form-data` with a `name` text field and a `photo`
//! file field; responds 201 with the new identity's id and name.

use axum::{
  Json,
  extract::{Multipart, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use rollcall_core::{
  extract::FaceExtractor,
  photos::PhotoStore,
  store::{AttendanceLedger, IdentityStore},
};
use serde_json::json;

use crate::{AppState, error::ApiError};

struct EnrollForm {
  name:  String,
  photo: Bytes,
}

async fn read_form(mut multipart: Multipart) -> Result<EnrollForm, ApiError> {
  let mut name: Option<String> = None;
  let mut photo: Option<Bytes> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
  {
    let Some(field_name) = field.name().map(str::to_owned) else {
      continue;
    };
    match field_name.as_str() {
      "name" => {
        let text = field
          .text()
          .await
          .map_err(|e| ApiError::BadRequest(format!("reading name field: {e}")))?;
        name = Some(text);
      }
      "photo" => {
        let bytes = field
          .bytes()
          .await
          .map_err(|e| ApiError::BadRequest(format!("reading photo field: {e}")))?;
        photo = Some(bytes);
      }
      // Unknown fields are ignored.
      _ => {}
    }
  }

  let name = name
    .map(|n| n.trim().to_string())
    .filter(|n| !n.is_empty())
    .ok_or_else(|| ApiError::BadRequest("missing name field".to_string()))?;
  let photo =
    photo.ok_or_else(|| ApiError::BadRequest("missing photo file".to_string()))?;

  Ok(EnrollForm { name, photo })
}

/// `POST /api/enroll`
pub async fn enroll<S, X, P>(
  State(state): State<AppState<S, X, P>>,
  multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: IdentityStore + AttendanceLedger + Clone + Send + Sync + 'static,
  X: FaceExtractor + Clone + Send + Sync + 'static,
  P: PhotoStore + Clone + Send + Sync + 'static,
{
  let form = read_form(multipart).await?;
  let identity = state.pipeline.enroll(form.name, form.photo).await?;

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "id": identity.identity_id,
      "name": identity.name,
    })),
  ))
}
