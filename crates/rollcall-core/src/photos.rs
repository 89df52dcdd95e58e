//! The photo asset-store boundary.
//!
//! Enrollment photos are kept outside the identity record; the domain
//! holds only an opaque asset reference. Save failures abort enrollment.
//! Delete failures during identity removal are logged by the caller and
//! do not undo the record deletion.

use std::future::Future;

use crate::error::Error;

/// External storage for enrollment photos.
pub trait PhotoStore: Send + Sync {
  /// Persist `image` and return its opaque asset reference.
  fn save<'a>(
    &'a self,
    image: &'a [u8],
  ) -> impl Future<Output = Result<String, Error>> + Send + 'a;

  /// Remove an asset. Removing an already-absent asset is not an error.
  fn delete<'a>(
    &'a self,
    asset: &'a str,
  ) -> impl Future<Output = Result<(), Error>> + Send + 'a;

  /// Read an asset back, or `None` if no such asset exists.
  fn load<'a>(
    &'a self,
    asset: &'a str,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Error>> + Send + 'a;
}
