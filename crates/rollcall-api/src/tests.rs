//! Integration tests for the HTTP surface against an in-memory store and
//! a temp-dir photo store.

use std::{sync::Arc, time::Duration};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::{DateTime, Utc};
use rand_core::OsRng;
use rollcall_core::matcher::MatchPolicy;
use rollcall_store_sqlite::SqliteStore;
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  AppState, ServerConfig, assets::FsPhotoStore, auth::AuthConfig,
  extractor::StubExtractor, pipeline::Pipeline, router,
};

type TestState = AppState<SqliteStore, StubExtractor, FsPhotoStore>;

const ALICE_PHOTO: &[u8] = b"jpeg bytes standing in for a photo of alice";
const BOB_PHOTO: &[u8] = b"jpeg bytes standing in for a photo of bob";
const STRANGER_PHOTO: &[u8] = b"jpeg bytes standing in for a stranger's face";

fn photo_dir() -> std::path::PathBuf {
  std::env::temp_dir().join(format!("rollcall-test-{}", Uuid::new_v4()))
}

async fn make_state(password: &str) -> TestState {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let photos = Arc::new(FsPhotoStore::open(photo_dir()).await.unwrap());

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string();

  let pipeline = Pipeline::new(
    Arc::clone(&store),
    Arc::new(StubExtractor),
    Arc::clone(&photos),
    MatchPolicy::default(),
    Duration::from_secs(5),
  );

  AppState {
    pipeline: Arc::new(pipeline),
    store,
    photos,
    auth: Arc::new(AuthConfig {
      username:      "admin".to_string(),
      password_hash: hash,
    }),
  }
}

fn admin_auth() -> (header::HeaderName, String) {
  let encoded = B64.encode("admin:secret");
  (header::AUTHORIZATION, format!("Basic {encoded}"))
}

fn bad_auth() -> (header::HeaderName, String) {
  let encoded = B64.encode("admin:wrong");
  (header::AUTHORIZATION, format!("Basic {encoded}"))
}

// ── Multipart plumbing ──────────────────────────────────────────────────

const BOUNDARY: &str = "rollcall-test-boundary";

fn multipart_content_type() -> (header::HeaderName, String) {
  (
    header::CONTENT_TYPE,
    format!("multipart/form-data; boundary={BOUNDARY}"),
  )
}

fn text_part(name: &str, value: &str) -> Vec<u8> {
  format!(
    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
  )
  .into_bytes()
}

fn file_part(name: &str, bytes: &[u8]) -> Vec<u8> {
  let mut part = format!(
    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"photo.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
  )
  .into_bytes();
  part.extend_from_slice(bytes);
  part.extend_from_slice(b"\r\n");
  part
}

fn close_parts(mut body: Vec<u8>) -> Vec<u8> {
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  body
}

fn enroll_body(name: &str, photo: &[u8]) -> Vec<u8> {
  let mut body = text_part("name", name);
  body.extend_from_slice(&file_part("photo", photo));
  close_parts(body)
}

fn signin_body(photo: &[u8]) -> Vec<u8> {
  close_parts(file_part("photo", photo))
}

// ── Request plumbing ────────────────────────────────────────────────────

async fn send(
  state:   TestState,
  method:  &str,
  uri:     &str,
  headers: Vec<(header::HeaderName, String)>,
  body:    Vec<u8>,
) -> axum::response::Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = builder.body(Body::from(body)).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn enroll(state: &TestState, name: &str, photo: &[u8]) -> serde_json::Value {
  let resp = send(
    state.clone(),
    "POST",
    "/api/enroll",
    vec![multipart_content_type()],
    enroll_body(name, photo),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  json_body(resp).await
}

async fn signin(state: &TestState, photo: &[u8]) -> axum::response::Response {
  send(
    state.clone(),
    "POST",
    "/api/signin",
    vec![multipart_content_type()],
    signin_body(photo),
  )
  .await
}

async fn admin_get(state: &TestState, uri: &str) -> axum::response::Response {
  send(state.clone(), "GET", uri, vec![admin_auth()], Vec::new()).await
}

// ── Status ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn status_is_public_and_reports_version() {
  let state = make_state("secret").await;
  let resp = send(state, "GET", "/api/status", vec![], Vec::new()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json_body(resp).await;
  assert_eq!(body["service"], "rollcall");
  assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

// ── Enrollment ──────────────────────────────────────────────────────────

#[tokio::test]
async fn enroll_returns_created_identity() {
  let state = make_state("secret").await;
  let reply = enroll(&state, "Alice", ALICE_PHOTO).await;

  assert_eq!(reply["name"], "Alice");
  let id = reply["id"].as_str().unwrap();
  assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn enroll_without_name_is_bad_request() {
  let state = make_state("secret").await;
  let resp = send(
    state,
    "POST",
    "/api/enroll",
    vec![multipart_content_type()],
    signin_body(ALICE_PHOTO),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn enroll_with_blank_name_is_bad_request() {
  let state = make_state("secret").await;
  let resp = send(
    state,
    "POST",
    "/api/enroll",
    vec![multipart_content_type()],
    enroll_body("   ", ALICE_PHOTO),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn enroll_without_photo_is_bad_request() {
  let state = make_state("secret").await;
  let resp = send(
    state,
    "POST",
    "/api/enroll",
    vec![multipart_content_type()],
    close_parts(text_part("name", "Alice")),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn enroll_with_unusable_image_is_unprocessable() {
  let state = make_state("secret").await;
  let resp = send(
    state,
    "POST",
    "/api/enroll",
    vec![multipart_content_type()],
    enroll_body("Alice", b"x"),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ── Sign-in ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn signin_with_enrolled_photo_records_attendance() {
  let state = make_state("secret").await;
  let alice = enroll(&state, "Alice", ALICE_PHOTO).await;

  let resp = signin(&state, ALICE_PHOTO).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let receipt = json_body(resp).await;
  assert_eq!(receipt["id"], alice["id"]);
  assert_eq!(receipt["name"], "Alice");
  assert!(receipt["timestamp"].is_string());

  let records = json_body(admin_get(&state, "/api/attendance").await).await;
  let records = records.as_array().unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0]["identity_id"], alice["id"]);
  assert_eq!(records[0]["name"], "Alice");
}

#[tokio::test]
async fn signin_with_unknown_face_records_nothing() {
  let state = make_state("secret").await;
  enroll(&state, "Alice", ALICE_PHOTO).await;

  let resp = signin(&state, STRANGER_PHOTO).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let records = json_body(admin_get(&state, "/api/attendance").await).await;
  assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn signin_with_empty_roster_is_not_found() {
  let state = make_state("secret").await;
  let resp = signin(&state, ALICE_PHOTO).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signin_after_identity_deleted_falls_through() {
  let state = make_state("secret").await;
  let alice = enroll(&state, "Alice", ALICE_PHOTO).await;
  enroll(&state, "Bob", BOB_PHOTO).await;
  let id = alice["id"].as_str().unwrap();

  let del = send(
    state.clone(),
    "DELETE",
    &format!("/api/identities/{id}"),
    vec![admin_auth()],
    Vec::new(),
  )
  .await;
  assert_eq!(del.status(), StatusCode::NO_CONTENT);

  // Bob's descriptor is nowhere near Alice's photo, so nothing matches.
  let resp = signin(&state, ALICE_PHOTO).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  // Bob himself is unaffected.
  let resp = signin(&state, BOB_PHOTO).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["name"], "Bob");
}

#[tokio::test]
async fn concurrent_signins_both_record() {
  let state = make_state("secret").await;
  let alice = enroll(&state, "Alice", ALICE_PHOTO).await;

  let (first, second) =
    tokio::join!(signin(&state, ALICE_PHOTO), signin(&state, ALICE_PHOTO));
  assert_eq!(first.status(), StatusCode::OK);
  assert_eq!(second.status(), StatusCode::OK);

  let records = json_body(admin_get(&state, "/api/attendance").await).await;
  let records = records.as_array().unwrap().clone();
  assert_eq!(records.len(), 2);
  assert!(records.iter().all(|r| r["identity_id"] == alice["id"]));
}

#[tokio::test]
async fn attendance_timestamp_not_before_enrollment() {
  let state = make_state("secret").await;
  enroll(&state, "Alice", ALICE_PHOTO).await;
  let resp = signin(&state, ALICE_PHOTO).await;
  let receipt = json_body(resp).await;

  let identities = json_body(admin_get(&state, "/api/identities").await).await;
  let created: DateTime<Utc> =
    serde_json::from_value(identities[0]["created_at"].clone()).unwrap();
  let recorded: DateTime<Utc> =
    serde_json::from_value(receipt["timestamp"].clone()).unwrap();

  assert!(recorded >= created);
}

// ── Admin gate ──────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_routes_require_credentials() {
  let state = make_state("secret").await;
  let alice = enroll(&state, "Alice", ALICE_PHOTO).await;
  let id = alice["id"].as_str().unwrap().to_string();

  let admin_routes = [
    ("GET", "/api/identities".to_string()),
    ("GET", "/api/attendance".to_string()),
    ("GET", "/api/photos/whatever.jpg".to_string()),
    ("DELETE", format!("/api/identities/{id}")),
  ];

  for (method, uri) in admin_routes {
    let resp = send(state.clone(), method, &uri, vec![], Vec::new()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    assert!(
      resp.headers().contains_key(header::WWW_AUTHENTICATE),
      "{method} {uri}"
    );
  }
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
  let state = make_state("secret").await;
  let resp = send(
    state,
    "GET",
    "/api/identities",
    vec![bad_auth()],
    Vec::new(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Roster and photos ───────────────────────────────────────────────────

#[tokio::test]
async fn roster_lists_identities_with_photo_references() {
  let state = make_state("secret").await;
  enroll(&state, "Alice", ALICE_PHOTO).await;
  enroll(&state, "Bob", BOB_PHOTO).await;

  let roster = json_body(admin_get(&state, "/api/identities").await).await;
  let roster = roster.as_array().unwrap().clone();
  assert_eq!(roster.len(), 2);
  assert_eq!(roster[0]["name"], "Alice");
  assert_eq!(roster[1]["name"], "Bob");
  assert!(roster[0]["photo"].as_str().unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn delete_removes_identity_records_and_photo() {
  let state = make_state("secret").await;
  let alice = enroll(&state, "Alice", ALICE_PHOTO).await;
  let id = alice["id"].as_str().unwrap().to_string();
  signin(&state, ALICE_PHOTO).await;

  let roster = json_body(admin_get(&state, "/api/identities").await).await;
  let asset = roster[0]["photo"].as_str().unwrap().to_string();

  let photo = admin_get(&state, &format!("/api/photos/{asset}")).await;
  assert_eq!(photo.status(), StatusCode::OK);
  let bytes = axum::body::to_bytes(photo.into_body(), usize::MAX).await.unwrap();
  assert_eq!(&bytes[..], ALICE_PHOTO);

  let del = send(
    state.clone(),
    "DELETE",
    &format!("/api/identities/{id}"),
    vec![admin_auth()],
    Vec::new(),
  )
  .await;
  assert_eq!(del.status(), StatusCode::NO_CONTENT);

  let records = json_body(admin_get(&state, "/api/attendance").await).await;
  assert!(records.as_array().unwrap().is_empty());

  let gone = admin_get(&state, &format!("/api/photos/{asset}")).await;
  assert_eq!(gone.status(), StatusCode::NOT_FOUND);

  let again = send(
    state.clone(),
    "DELETE",
    &format!("/api/identities/{id}"),
    vec![admin_auth()],
    Vec::new(),
  )
  .await;
  assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn attendance_is_newest_first() {
  let state = make_state("secret").await;
  enroll(&state, "Alice", ALICE_PHOTO).await;
  enroll(&state, "Bob", BOB_PHOTO).await;

  signin(&state, ALICE_PHOTO).await;
  signin(&state, BOB_PHOTO).await;

  let records = json_body(admin_get(&state, "/api/attendance").await).await;
  let records = records.as_array().unwrap().clone();
  assert_eq!(records.len(), 2);
  assert_eq!(records[0]["name"], "Bob");
  assert_eq!(records[1]["name"], "Alice");
}

#[tokio::test]
async fn photo_traversal_reference_is_not_found() {
  let state = make_state("secret").await;
  let resp = admin_get(&state, "/api/photos/..%2Fconfig.toml").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Pipeline edges ──────────────────────────────────────────────────────

#[derive(Clone)]
struct SlowExtractor;

impl rollcall_core::extract::FaceExtractor for SlowExtractor {
  fn extract(
    &self,
    _image: &[u8],
  ) -> Result<rollcall_core::descriptor::Descriptor, rollcall_core::Error> {
    std::thread::sleep(Duration::from_millis(200));
    Ok(rollcall_core::descriptor::Descriptor::new(vec![0.5; 128]))
  }
}

#[tokio::test]
async fn extraction_deadline_surfaces_as_timeout() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let photos = Arc::new(FsPhotoStore::open(photo_dir()).await.unwrap());
  let pipeline = Pipeline::new(
    store,
    Arc::new(SlowExtractor),
    photos,
    MatchPolicy::default(),
    Duration::from_millis(20),
  );

  let err = pipeline
    .enroll("Alice".to_string(), ALICE_PHOTO.to_vec().into())
    .await
    .unwrap_err();
  assert!(matches!(err, rollcall_core::Error::ExtractTimeout(_)));
}

#[derive(Clone)]
struct FailingStore;

impl rollcall_core::store::IdentityStore for FailingStore {
  async fn add_identity(
    &self,
    _new: rollcall_core::identity::NewIdentity,
  ) -> rollcall_core::Result<rollcall_core::identity::Identity> {
    Err(rollcall_core::Error::Storage("disk full".into()))
  }
  async fn get_identity(
    &self,
    _id: Uuid,
  ) -> rollcall_core::Result<Option<rollcall_core::identity::Identity>> {
    unimplemented!()
  }
  async fn list_identities(
    &self,
  ) -> rollcall_core::Result<Vec<rollcall_core::identity::IdentitySummary>> {
    unimplemented!()
  }
  async fn all_descriptors(
    &self,
  ) -> rollcall_core::Result<Vec<rollcall_core::identity::EnrolledDescriptor>> {
    unimplemented!()
  }
  async fn delete_identity(
    &self,
    _id: Uuid,
  ) -> rollcall_core::Result<Option<rollcall_core::identity::Identity>> {
    unimplemented!()
  }
}

impl rollcall_core::store::AttendanceLedger for FailingStore {
  async fn append_event(
    &self,
    _identity_id: Uuid,
  ) -> rollcall_core::Result<rollcall_core::attendance::AttendanceRecord> {
    unimplemented!()
  }
  async fn list_events(
    &self,
  ) -> rollcall_core::Result<Vec<rollcall_core::attendance::AttendanceRecord>> {
    unimplemented!()
  }
}

#[tokio::test]
async fn failed_enrollment_leaves_no_orphan_photo() {
  let dir = photo_dir();
  let photos = Arc::new(FsPhotoStore::open(dir.clone()).await.unwrap());
  let pipeline = Pipeline::new(
    Arc::new(FailingStore),
    Arc::new(StubExtractor),
    photos,
    MatchPolicy::default(),
    Duration::from_secs(5),
  );

  let err = pipeline
    .enroll("Alice".to_string(), ALICE_PHOTO.to_vec().into())
    .await
    .unwrap_err();
  assert!(matches!(err, rollcall_core::Error::Storage(_)));

  let leftover = std::fs::read_dir(&dir).unwrap().count();
  assert_eq!(leftover, 0);
}

// ── Config ──────────────────────────────────────────────────────────────

#[test]
fn config_defaults_apply() {
  let cfg: ServerConfig = serde_json::from_value(serde_json::json!({
    "auth_username": "admin",
    "auth_password_hash": "$argon2id$v=19$placeholder",
  }))
  .unwrap();

  assert_eq!(cfg.port, 8350);
  assert_eq!(cfg.match_threshold, 0.6);
  assert_eq!(cfg.extract_timeout(), Duration::from_secs(10));
  assert_eq!(
    cfg.match_policy().metric,
    rollcall_core::matcher::DistanceMetric::Euclidean
  );
}
