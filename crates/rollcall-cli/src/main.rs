//! `rollcall` — command-line client for the rollcall attendance server.
//!
//! # Usage
//!
//! ```
//! rollcall enroll "Ada Lovelace" ada.jpg
//! rollcall signin ada.jpg
//! rollcall --user admin --password secret identities
//! rollcall --config ~/.config/rollcall/config.toml attendance
//! ```

mod client;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rollcall", about = "Client for the rollcall attendance server")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the rollcall server (default: http://127.0.0.1:8350).
  #[arg(long, env = "ROLLCALL_URL")]
  url: Option<String>,

  /// Admin username, required for the admin subcommands.
  #[arg(long, env = "ROLLCALL_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "ROLLCALL_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Enroll a person from a photo.
  Enroll {
    /// Display name for the new identity.
    name:  String,
    /// Path to a photo of their face.
    photo: PathBuf,
  },
  /// Sign in by face photo.
  Signin {
    /// Path to a photo of the face signing in.
    photo: PathBuf,
  },
  /// List enrolled identities (admin).
  Identities,
  /// Remove an identity and its attendance records (admin).
  Remove {
    /// Identity id, as printed by `identities`.
    id: Uuid,
  },
  /// Show the attendance ledger, newest first (admin).
  Attendance,
  /// Check that the server is reachable.
  Status,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://127.0.0.1:8350".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Enroll { name, photo } => {
      let receipt = client.enroll(&name, &photo).await?;
      println!("enrolled {} ({})", receipt.name, receipt.id);
    }
    Command::Signin { photo } => {
      let receipt = client.sign_in(&photo).await?;
      println!(
        "{} signed in at {}",
        receipt.name,
        receipt
          .timestamp
          .with_timezone(&Local)
          .format("%Y-%m-%d %H:%M:%S")
      );
    }
    Command::Identities => {
      let identities = client.list_identities().await?;
      if identities.is_empty() {
        println!("no identities enrolled");
      }
      for summary in identities {
        println!(
          "{}  {}  {}",
          summary.identity_id,
          summary
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M"),
          summary.name
        );
      }
    }
    Command::Remove { id } => {
      client.remove_identity(id).await?;
      println!("removed {id}");
    }
    Command::Attendance => {
      let records = client.list_attendance().await?;
      if records.is_empty() {
        println!("no attendance records");
      }
      for record in records {
        println!(
          "{}  {}",
          record
            .recorded_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S"),
          record.name
        );
      }
    }
    Command::Status => {
      let status = client.status().await?;
      println!(
        "{} {} is up",
        status["service"].as_str().unwrap_or("rollcall"),
        status["version"].as_str().unwrap_or("unknown")
      );
    }
  }

  Ok(())
}
