//! Filesystem-backed photo asset store.
//!
//! Assets are written as `<uuid>.jpg` under one flat directory; the
//! reference handed to the domain is the bare filename. References that
//! name anything outside the directory are treated as never existing.

use std::path::PathBuf;

use rollcall_core::{Result, error::Error, photos::PhotoStore};
use uuid::Uuid;

/// A photo store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct FsPhotoStore {
  dir: PathBuf,
}

impl FsPhotoStore {
  /// Open the store, creating the directory if needed.
  pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
    let dir = dir.into();
    tokio::fs::create_dir_all(&dir)
      .await
      .map_err(|e| Error::Asset(format!("creating {}: {e}", dir.display())))?;
    Ok(Self { dir })
  }

  /// Resolve an asset reference, or `None` if it could escape the
  /// directory. save() only ever hands out bare filenames, so anything
  /// with a separator or parent component was not issued by us.
  fn asset_path(&self, asset: &str) -> Option<PathBuf> {
    if asset.is_empty()
      || asset.contains('/')
      || asset.contains('\\')
      || asset.contains("..")
    {
      return None;
    }
    Some(self.dir.join(asset))
  }
}

impl PhotoStore for FsPhotoStore {
  async fn save(&self, image: &[u8]) -> Result<String> {
    let asset = format!("{}.jpg", Uuid::new_v4());
    let path = self.dir.join(&asset);
    tokio::fs::write(&path, image)
      .await
      .map_err(|e| Error::Asset(format!("writing {}: {e}", path.display())))?;
    Ok(asset)
  }

  async fn delete(&self, asset: &str) -> Result<()> {
    let Some(path) = self.asset_path(asset) else {
      tracing::warn!(asset, "refusing to delete malformed asset reference");
      return Ok(());
    };

    match tokio::fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(Error::Asset(format!("removing {}: {e}", path.display()))),
    }
  }

  async fn load(&self, asset: &str) -> Result<Option<Vec<u8>>> {
    let Some(path) = self.asset_path(asset) else {
      return Ok(None);
    };

    match tokio::fs::read(&path).await {
      Ok(bytes) => Ok(Some(bytes)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(Error::Asset(format!("reading {}: {e}", path.display()))),
    }
  }
}
