//! The enrollment and sign-in pipelines.
//!
//! Coordinates extractor → store/matcher → ledger for the two public
//! flows, plus identity removal with photo cleanup. Flows are single-pass
//! and non-retrying: a failure at any stage terminates the request with
//! its specific cause and leaves no partial state behind.

use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use rollcall_core::{
  Result,
  attendance::AttendanceRecord,
  descriptor::Descriptor,
  error::Error,
  extract::FaceExtractor,
  identity::{Identity, NewIdentity},
  matcher::{MatchPolicy, Matcher as _, NearestMatcher},
  photos::PhotoStore,
  store::{AttendanceLedger, IdentityStore},
};
use uuid::Uuid;

/// Owns the extractor, match policy, store handle, and photo store, and
/// runs the end-to-end flows the HTTP handlers expose.
pub struct Pipeline<S, X, P> {
  store:           Arc<S>,
  extractor:       Arc<X>,
  photos:          Arc<P>,
  matcher:         NearestMatcher,
  extract_timeout: Duration,
}

impl<S, X, P> Pipeline<S, X, P>
where
  S: IdentityStore + AttendanceLedger + 'static,
  X: FaceExtractor + 'static,
  P: PhotoStore + 'static,
{
  pub fn new(
    store: Arc<S>,
    extractor: Arc<X>,
    photos: Arc<P>,
    policy: MatchPolicy,
    extract_timeout: Duration,
  ) -> Self {
    Self {
      store,
      extractor,
      photos,
      matcher: NearestMatcher::new(policy),
      extract_timeout,
    }
  }

  /// Run the extractor on a blocking worker, bounded by the configured
  /// deadline. Timing out abandons the worker — blocking tasks cannot be
  /// cancelled — but the request fails promptly either way.
  async fn extract(&self, image: Bytes) -> Result<Descriptor> {
    let extractor = Arc::clone(&self.extractor);
    let work = tokio::task::spawn_blocking(move || extractor.extract(&image));

    match tokio::time::timeout(self.extract_timeout, work).await {
      Ok(Ok(result)) => result,
      Ok(Err(join)) => Err(Error::Extraction(format!("extractor worker failed: {join}"))),
      Err(_) => Err(Error::ExtractTimeout(self.extract_timeout)),
    }
  }

  /// Enrollment: extract a descriptor, save the photo, add the identity.
  ///
  /// The photo is saved before the record write; if the record write then
  /// fails, the just-saved asset is deleted so no orphan photo remains.
  pub async fn enroll(&self, name: String, image: Bytes) -> Result<Identity> {
    let descriptor = self.extract(image.clone()).await?;

    let asset = self.photos.save(&image).await?;

    let added = self
      .store
      .add_identity(NewIdentity {
        name,
        descriptor,
        photo: Some(asset.clone()),
      })
      .await;

    match added {
      Ok(identity) => {
        tracing::info!(
          identity_id = %identity.identity_id,
          name = %identity.name,
          "identity enrolled"
        );
        Ok(identity)
      }
      Err(err) => {
        if let Err(cleanup) = self.photos.delete(&asset).await {
          tracing::warn!(
            asset = %asset,
            error = %cleanup,
            "failed to remove photo after enrollment failure"
          );
        }
        Err(err)
      }
    }
  }

  /// Sign-in: extract a probe, match it against a snapshot of all
  /// enrolled descriptors, append a ledger event for the winner.
  pub async fn sign_in(&self, image: Bytes) -> Result<AttendanceRecord> {
    let probe = self.extract(image).await?;

    let candidates = self.store.all_descriptors().await?;
    let Some(matched) = self.matcher.find_best(&probe, &candidates) else {
      tracing::info!(
        candidates = candidates.len(),
        "sign-in matched nothing within threshold"
      );
      return Err(Error::NoMatch);
    };

    tracing::debug!(
      identity_id = %matched.identity_id,
      distance = matched.distance,
      "probe matched"
    );

    // The identity can vanish between match and append; the ledger's
    // in-transaction check turns that race into UnknownIdentity.
    let record = self.store.append_event(matched.identity_id).await?;
    tracing::info!(
      identity_id = %record.identity_id,
      event_id = record.event_id,
      "attendance recorded"
    );
    Ok(record)
  }

  /// Remove an identity, its attendance records (store cascade), and its
  /// photo asset. Returns whether the identity existed. Asset-cleanup
  /// failure is logged and does not undo the record deletion.
  pub async fn remove_identity(&self, id: Uuid) -> Result<bool> {
    let Some(deleted) = self.store.delete_identity(id).await? else {
      return Ok(false);
    };

    if let Some(asset) = &deleted.photo
      && let Err(err) = self.photos.delete(asset).await
    {
      tracing::warn!(
        identity_id = %id,
        asset = %asset,
        error = %err,
        "failed to remove photo for deleted identity"
      );
    }

    tracing::info!(identity_id = %id, "identity deleted");
    Ok(true)
  }
}
