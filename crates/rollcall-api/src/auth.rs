//! HTTP Basic-auth extractor guarding the admin endpoints.
//!
//! Enrollment and sign-in are deliberately public (a kiosk has no
//! operator to type a password); roster listing, deletion, attendance
//! history, and photo retrieval require the configured admin credentials
//! on every request. No session state is kept.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use rollcall_core::{
  extract::FaceExtractor,
  photos::PhotoStore,
  store::{AttendanceLedger, IdentityStore},
};

use crate::{AppState, error::ApiError};

/// Credentials accepted as the admin for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in a handler means the request passed the
/// admin gate.
pub struct Admin;

/// Verify admin credentials directly from request headers.
pub fn verify_admin(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  if username != config.username {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

impl<S, X, P> FromRequestParts<AppState<S, X, P>> for Admin
where
  S: IdentityStore + AttendanceLedger + Clone + Send + Sync + 'static,
  X: FaceExtractor + Clone + Send + Sync + 'static,
  P: PhotoStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, X, P>,
  ) -> Result<Self, Self::Rejection> {
    verify_admin(&parts.headers, &state.auth)?;
    Ok(Admin)
  }
}
