//! Deterministic stand-in descriptor extractor.

use rollcall_core::{descriptor::Descriptor, error::Error, extract::FaceExtractor};
use sha2::{Digest, Sha256};

/// Descriptor dimensionality produced by [`StubExtractor`] — the usual
/// 128-component face-embedding convention.
pub const STUB_DESCRIPTOR_DIM: usize = 128;

/// Smallest input treated as a plausible photograph; anything shorter
/// reports no face.
const MIN_IMAGE_BYTES: usize = 16;

/// Deterministic extractor standing in for a real embedding model.
///
/// Expands a SHA-256 digest of the image bytes into 128 components in
/// `[0, 1]` by counter-mode hashing. Identical inputs produce identical
/// descriptors; distinct inputs land far apart relative to the default
/// 0.6 acceptance threshold, so an enrolled photo only ever matches
/// itself. That makes the full enroll → sign-in → ledger path testable
/// without a model runtime.
// TODO: swap in an ONNX-backed implementation behind the same trait once
// a model is chosen.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubExtractor;

impl FaceExtractor for StubExtractor {
  fn extract(&self, image: &[u8]) -> Result<Descriptor, Error> {
    if image.len() < MIN_IMAGE_BYTES {
      return Err(Error::NoFaceDetected);
    }

    let digest = Sha256::digest(image);

    // Counter-mode expansion: each block hash yields 8 components.
    let mut values = Vec::with_capacity(STUB_DESCRIPTOR_DIM);
    let mut block: u32 = 0;
    while values.len() < STUB_DESCRIPTOR_DIM {
      let mut hasher = Sha256::new();
      hasher.update(digest);
      hasher.update(block.to_le_bytes());
      let expanded = hasher.finalize();

      for chunk in expanded.chunks_exact(4) {
        if values.len() == STUB_DESCRIPTOR_DIM {
          break;
        }
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        values.push(word as f32 / u32::MAX as f32);
      }
      block += 1;
    }

    Ok(Descriptor::new(values))
  }
}
