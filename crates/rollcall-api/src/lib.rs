//! HTTP layer and request orchestration for the rollcall attendance
//! service.
//!
//! Exposes an axum [`Router`] backed by any [`IdentityStore`] +
//! [`AttendanceLedger`] implementation, with the enrollment and sign-in
//! flows in [`pipeline`]. TLS termination and deployment transport are
//! the operator's responsibility.

pub mod assets;
pub mod auth;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod pipeline;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{delete, get, post},
};
use rollcall_core::{
  extract::FaceExtractor,
  matcher::{DistanceMetric, MatchPolicy},
  photos::PhotoStore,
  store::{AttendanceLedger, IdentityStore},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use pipeline::Pipeline;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` merged
/// with `ROLLCALL_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// Path to the SQLite database file.
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// Directory holding enrollment photo assets.
  #[serde(default = "default_photo_dir")]
  pub photo_dir:            PathBuf,
  pub auth_username:        String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  /// (`rollcall-server --hash-password` prints one).
  pub auth_password_hash:   String,
  /// A sign-in matches only when the nearest distance is strictly below
  /// this value.
  #[serde(default = "default_match_threshold")]
  pub match_threshold:      f32,
  #[serde(default)]
  pub match_metric:         DistanceMetric,
  /// Deadline for a single descriptor extraction, in seconds.
  #[serde(default = "default_extract_timeout_secs")]
  pub extract_timeout_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8350 }
fn default_store_path() -> PathBuf { PathBuf::from("rollcall.db") }
fn default_photo_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_match_threshold() -> f32 { 0.6 }
fn default_extract_timeout_secs() -> u64 { 10 }

impl ServerConfig {
  /// The single [`MatchPolicy`] every match decision flows through.
  pub fn match_policy(&self) -> MatchPolicy {
    MatchPolicy {
      metric:       self.match_metric,
      max_distance: self.match_threshold,
    }
  }

  pub fn extract_timeout(&self) -> Duration {
    Duration::from_secs(self.extract_timeout_secs)
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S, X, P> {
  pub pipeline: Arc<Pipeline<S, X, P>>,
  pub store:    Arc<S>,
  pub photos:   Arc<P>,
  pub auth:     Arc<AuthConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Largest accepted request body. Enrollment photos are a few MiB; leave
/// headroom for phone-camera JPEGs.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Build the axum [`Router`] for the service.
pub fn router<S, X, P>(state: AppState<S, X, P>) -> Router
where
  S: IdentityStore + AttendanceLedger + Clone + Send + Sync + 'static,
  X: FaceExtractor + Clone + Send + Sync + 'static,
  P: PhotoStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/api/status",          get(handlers::status))
    .route("/api/enroll",          post(handlers::enroll::<S, X, P>))
    .route("/api/signin",          post(handlers::signin::<S, X, P>))
    .route("/api/identities",      get(handlers::list_identities::<S, X, P>))
    .route("/api/identities/{id}", delete(handlers::delete_identity::<S, X, P>))
    .route("/api/attendance",      get(handlers::list_attendance::<S, X, P>))
    .route("/api/photos/{asset}",  get(handlers::get_photo::<S, X, P>))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
