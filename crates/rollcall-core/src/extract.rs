//! The descriptor-extraction boundary.
//!
//! Turning image bytes into a [`Descriptor`] is an external capability;
//! implementations live outside this crate and are swapped behind
//! [`FaceExtractor`] without touching the matcher or the store.

use crate::{descriptor::Descriptor, error::Error};

/// Pluggable descriptor-extraction backend.
///
/// Contract:
/// - Deterministic: identical input bytes yield an identical descriptor,
///   up to the backend's own numerical stability.
/// - Fixed dimensionality: every descriptor from one backend has the
///   same length.
/// - Multiple faces: implementations use the face with the largest
///   bounding box, breaking ties toward the top-left of the frame.
/// - No usable face: [`Error::NoFaceDetected`]. Any other failure is
///   [`Error::Extraction`].
///
/// `extract` may be CPU-bound; callers run it on a blocking worker under
/// a deadline rather than on the async runtime.
pub trait FaceExtractor: Send + Sync {
  fn extract(&self, image: &[u8]) -> Result<Descriptor, Error>;
}
