//! Async HTTP client wrapping the rollcall JSON API.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rollcall_core::{attendance::AttendanceRecord, identity::IdentitySummary};
use reqwest::{Client, multipart};
use serde::Deserialize;
use uuid::Uuid;

/// Connection settings for the rollcall API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// What `POST /api/enroll` returns.
#[derive(Debug, Deserialize)]
pub struct EnrollReceipt {
  pub id:   Uuid,
  pub name: String,
}

/// What `POST /api/signin` returns.
#[derive(Debug, Deserialize)]
pub struct SigninReceipt {
  pub id:        Uuid,
  pub name:      String,
  pub timestamp: DateTime<Utc>,
}

/// Async HTTP client for the rollcall JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Build an error from a non-success response, surfacing the server's
  /// `{"error": …}` detail when the body carries one.
  async fn api_error(what: &str, resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    let detail = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_owned));

    match detail {
      Some(msg) => anyhow!("{what} → {status}: {msg}"),
      None => anyhow!("{what} → {status}"),
    }
  }

  async fn photo_form(photo: &Path) -> Result<multipart::Part> {
    let bytes = tokio::fs::read(photo)
      .await
      .with_context(|| format!("reading photo {}", photo.display()))?;
    let part = multipart::Part::bytes(bytes)
      .file_name(
        photo
          .file_name()
          .map(|n| n.to_string_lossy().into_owned())
          .unwrap_or_else(|| "photo.jpg".to_string()),
      )
      .mime_str("image/jpeg")
      .context("setting photo MIME type")?;
    Ok(part)
  }

  // ── Enrollment and sign-in ─────────────────────────────────────────────────

  /// `POST /api/enroll` (multipart: `name`, `photo`)
  pub async fn enroll(&self, name: &str, photo: &Path) -> Result<EnrollReceipt> {
    let form = multipart::Form::new()
      .text("name", name.to_string())
      .part("photo", Self::photo_form(photo).await?);

    let resp = self
      .client
      .post(self.url("/enroll"))
      .multipart(form)
      .send()
      .await
      .context("POST /enroll failed")?;

    if !resp.status().is_success() {
      return Err(Self::api_error("POST /enroll", resp).await);
    }
    resp.json().await.context("deserialising enrollment receipt")
  }

  /// `POST /api/signin` (multipart: `photo`)
  pub async fn sign_in(&self, photo: &Path) -> Result<SigninReceipt> {
    let form =
      multipart::Form::new().part("photo", Self::photo_form(photo).await?);

    let resp = self
      .client
      .post(self.url("/signin"))
      .multipart(form)
      .send()
      .await
      .context("POST /signin failed")?;

    if !resp.status().is_success() {
      return Err(Self::api_error("POST /signin", resp).await);
    }
    resp.json().await.context("deserialising sign-in receipt")
  }

  // ── Admin ──────────────────────────────────────────────────────────────────

  /// `GET /api/identities`
  pub async fn list_identities(&self) -> Result<Vec<IdentitySummary>> {
    let resp = self
      .auth(self.client.get(self.url("/identities")))
      .send()
      .await
      .context("GET /identities failed")?;

    if !resp.status().is_success() {
      return Err(Self::api_error("GET /identities", resp).await);
    }
    resp.json().await.context("deserialising identities")
  }

  /// `DELETE /api/identities/{id}`
  pub async fn remove_identity(&self, id: Uuid) -> Result<()> {
    let resp = self
      .auth(self.client.delete(self.url(&format!("/identities/{id}"))))
      .send()
      .await
      .context("DELETE /identities failed")?;

    if !resp.status().is_success() {
      return Err(Self::api_error("DELETE /identities", resp).await);
    }
    Ok(())
  }

  /// `GET /api/attendance`
  pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>> {
    let resp = self
      .auth(self.client.get(self.url("/attendance")))
      .send()
      .await
      .context("GET /attendance failed")?;

    if !resp.status().is_success() {
      return Err(Self::api_error("GET /attendance", resp).await);
    }
    resp.json().await.context("deserialising attendance records")
  }

  /// `GET /api/status`
  pub async fn status(&self) -> Result<serde_json::Value> {
    let resp = self
      .client
      .get(self.url("/status"))
      .send()
      .await
      .context("GET /status failed")?;

    if !resp.status().is_success() {
      return Err(Self::api_error("GET /status", resp).await);
    }
    resp.json().await.context("deserialising status")
  }
}
