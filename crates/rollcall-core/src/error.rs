//! Error types for `rollcall-core` — the failure taxonomy of the
//! enrollment and sign-in pipelines.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The extractor found no usable face in the submitted image.
  #[error("no face detected in image")]
  NoFaceDetected,

  /// A zero-length descriptor was offered for enrollment.
  #[error("descriptor has no components")]
  EmptyDescriptor,

  /// A descriptor's length disagrees with the enrolled population.
  #[error("descriptor dimension mismatch: expected {expected}, found {found}")]
  DescriptorDimension { expected: usize, found: usize },

  /// The referenced identity does not exist. Also covers the race where an
  /// identity is deleted between matching and ledger append.
  #[error("unknown identity: {0}")]
  UnknownIdentity(Uuid),

  /// No enrolled descriptor fell within the acceptance threshold.
  #[error("no enrolled identity matched")]
  NoMatch,

  /// The extractor backend failed for a reason other than "no face".
  #[error("descriptor extraction failed: {0}")]
  Extraction(String),

  /// The extractor did not produce a descriptor within the deadline.
  #[error("descriptor extraction timed out after {0:?}")]
  ExtractTimeout(Duration),

  /// The durable store failed to read or write.
  #[error("storage failure: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The photo asset store failed to save, load, or delete an asset.
  #[error("photo asset failure: {0}")]
  Asset(String),
}

impl Error {
  /// Wrap an arbitrary backend error as a storage failure.
  pub fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Storage(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
