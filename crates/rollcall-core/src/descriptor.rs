//! Descriptor — the fixed-length facial feature vector.
//!
//! Descriptors are produced by an extractor backend and compared with the
//! distance functions here. All enrolled descriptors share one
//! dimensionality: the store rejects mismatches on write, and the matcher
//! skips any mismatched row it still encounters on read.

use serde::{Deserialize, Serialize};

/// A fixed-length real-valued facial feature vector.
///
/// The components are opaque to this crate; only their count and relative
/// distances carry meaning. Distance functions assume equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(Vec<f32>);

impl Descriptor {
  pub fn new(values: Vec<f32>) -> Self {
    Self(values)
  }

  /// Number of components.
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn as_slice(&self) -> &[f32] {
    &self.0
  }

  /// Euclidean (L2) distance to `other`.
  pub fn euclidean_distance(&self, other: &Descriptor) -> f32 {
    self
      .0
      .iter()
      .zip(other.0.iter())
      .map(|(a, b)| (a - b).powi(2))
      .sum::<f32>()
      .sqrt()
  }

  /// Cosine distance to `other`: `1 - cosine similarity`, in `[0, 2]`.
  ///
  /// A zero-magnitude vector has no direction; its similarity to anything
  /// is taken as 0, i.e. distance 1.
  pub fn cosine_distance(&self, other: &Descriptor) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (a, b) in self.0.iter().zip(other.0.iter()) {
      dot += a * b;
      norm_a += a * a;
      norm_b += b * b;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom > 0.0 { 1.0 - dot / denom } else { 1.0 }
  }
}

impl From<Vec<f32>> for Descriptor {
  fn from(values: Vec<f32>) -> Self {
    Self(values)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn euclidean_distance_of_identical_vectors_is_zero() {
    let a = Descriptor::new(vec![0.1, 0.2, 0.3]);
    let b = a.clone();
    assert_eq!(a.euclidean_distance(&b), 0.0);
  }

  #[test]
  fn euclidean_distance_matches_hand_computation() {
    let a = Descriptor::new(vec![0.0, 0.0]);
    let b = Descriptor::new(vec![3.0, 4.0]);
    assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-6);
  }

  #[test]
  fn cosine_distance_is_zero_for_parallel_vectors() {
    let a = Descriptor::new(vec![1.0, 2.0, 3.0]);
    let b = Descriptor::new(vec![2.0, 4.0, 6.0]);
    assert!(a.cosine_distance(&b).abs() < 1e-6);
  }

  #[test]
  fn cosine_distance_is_one_for_orthogonal_vectors() {
    let a = Descriptor::new(vec![1.0, 0.0]);
    let b = Descriptor::new(vec![0.0, 1.0]);
    assert!((a.cosine_distance(&b) - 1.0).abs() < 1e-6);
  }

  #[test]
  fn cosine_distance_of_zero_vector_is_one() {
    let zero = Descriptor::new(vec![0.0, 0.0]);
    let b = Descriptor::new(vec![1.0, 1.0]);
    assert!((zero.cosine_distance(&b) - 1.0).abs() < 1e-6);
  }
}
