//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Domain failures carry their own HTTP mapping: a sign-in that matches
//! nobody is 404, a vanished identity is 409, an extractor deadline is
//! 504. Everything the client can fix is 4xx; everything else is 500.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] rollcall_core::Error),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    use rollcall_core::Error as Core;

    match self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        Core::NoFaceDetected => StatusCode::UNPROCESSABLE_ENTITY,
        Core::NoMatch => StatusCode::NOT_FOUND,
        Core::UnknownIdentity(_) => StatusCode::CONFLICT,
        Core::ExtractTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Core::EmptyDescriptor
        | Core::DescriptorDimension { .. }
        | Core::Extraction(_)
        | Core::Storage(_)
        | Core::Asset(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();

    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let mut response =
      (status, Json(json!({ "error": self.to_string() }))).into_response();

    if status == StatusCode::UNAUTHORIZED {
      response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"rollcall\""),
      );
    }

    response
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use rollcall_core::Error as Core;
  use uuid::Uuid;

  #[test]
  fn domain_errors_map_to_documented_statuses() {
    let cases = [
      (ApiError::Core(Core::NoFaceDetected), StatusCode::UNPROCESSABLE_ENTITY),
      (ApiError::Core(Core::NoMatch), StatusCode::NOT_FOUND),
      (
        ApiError::Core(Core::UnknownIdentity(Uuid::new_v4())),
        StatusCode::CONFLICT,
      ),
      (
        ApiError::Core(Core::ExtractTimeout(Duration::from_secs(10))),
        StatusCode::GATEWAY_TIMEOUT,
      ),
      (
        ApiError::Core(Core::Extraction("backend crashed".into())),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
      (ApiError::Core(Core::EmptyDescriptor), StatusCode::INTERNAL_SERVER_ERROR),
      (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
    ];

    for (err, expected) in cases {
      assert_eq!(err.status(), expected);
    }
  }

  #[test]
  fn unauthorized_response_carries_challenge() {
    let response = ApiError::Unauthorized.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
  }
}
