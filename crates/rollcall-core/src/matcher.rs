//! Nearest-descriptor matching under a configurable acceptance threshold.
//!
//! Every match decision in the service flows through one [`MatchPolicy`]
//! constructed at startup. The threshold is never duplicated at call
//! sites, so "who counts as a match" has exactly one answer per process.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{descriptor::Descriptor, identity::EnrolledDescriptor};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Distance function applied between a probe and each candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
  /// Euclidean (L2) distance — the usual convention for 128-component
  /// face embeddings.
  #[default]
  Euclidean,
  /// Cosine distance, `1 - cosine similarity`.
  Cosine,
}

/// Metric plus acceptance threshold for match decisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
  pub metric:       DistanceMetric,
  /// A candidate is accepted only when its distance is strictly below
  /// this value.
  pub max_distance: f32,
}

impl Default for MatchPolicy {
  fn default() -> Self {
    Self { metric: DistanceMetric::Euclidean, max_distance: 0.6 }
  }
}

impl MatchPolicy {
  pub fn distance(&self, probe: &Descriptor, candidate: &Descriptor) -> f32 {
    match self.metric {
      DistanceMetric::Euclidean => probe.euclidean_distance(candidate),
      DistanceMetric::Cosine => probe.cosine_distance(candidate),
    }
  }
}

// ─── Matcher ─────────────────────────────────────────────────────────────────

/// An accepted match decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
  pub identity_id: Uuid,
  pub distance:    f32,
}

/// Strategy for picking the best enrolled candidate for a probe.
pub trait Matcher {
  /// Return the accepted best match, or `None` when the candidate set is
  /// empty or no candidate's distance clears the policy threshold.
  fn find_best(
    &self,
    probe: &Descriptor,
    candidates: &[EnrolledDescriptor],
  ) -> Option<Match>;
}

/// Linear scan over all candidates, keeping the minimum distance.
///
/// Candidates whose dimensionality disagrees with the probe are skipped
/// and logged as a data-integrity warning rather than failing the whole
/// match. Equidistant candidates resolve to the lowest identity id, so a
/// given probe against a given snapshot always names the same winner
/// regardless of candidate order.
#[derive(Debug, Clone, Copy)]
pub struct NearestMatcher {
  pub policy: MatchPolicy,
}

impl NearestMatcher {
  pub fn new(policy: MatchPolicy) -> Self {
    Self { policy }
  }
}

impl Matcher for NearestMatcher {
  fn find_best(
    &self,
    probe: &Descriptor,
    candidates: &[EnrolledDescriptor],
  ) -> Option<Match> {
    let mut best: Option<Match> = None;

    for candidate in candidates {
      if candidate.descriptor.len() != probe.len() {
        tracing::warn!(
          identity_id = %candidate.identity_id,
          expected = probe.len(),
          found = candidate.descriptor.len(),
          "skipping candidate with mismatched descriptor dimension"
        );
        continue;
      }

      let distance = self.policy.distance(probe, &candidate.descriptor);
      if !distance.is_finite() {
        tracing::warn!(
          identity_id = %candidate.identity_id,
          "skipping candidate with non-finite distance"
        );
        continue;
      }

      let better = match &best {
        None => true,
        Some(current) => {
          distance < current.distance
            || (distance == current.distance
              && candidate.identity_id < current.identity_id)
        }
      };
      if better {
        best = Some(Match { identity_id: candidate.identity_id, distance });
      }
    }

    best.filter(|m| m.distance < self.policy.max_distance)
  }
}
