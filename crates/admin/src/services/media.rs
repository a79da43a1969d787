//! Filesystem-backed media storage for product images.
//!
//! Uploads land under `{media_root}/{product_id}/{timestamp}-{index}.{ext}`
//! and are served back read-only from the `/media` route. The timestamp in
//! the name makes every upload unique, so files are never overwritten and
//! URLs stay immutable once handed out.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use clover_core::ProductId;

/// Extensions accepted for product images.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "avif"];

/// Media storage failure.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored image: where it lives on disk and the URL it is served under.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub path: PathBuf,
    pub url: String,
}

/// Filesystem media store.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    base_url: String,
}

impl MediaStore {
    #[must_use]
    pub fn new(root: PathBuf, base_url: String) -> Self {
        Self {
            root,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Directory served by the static file route.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store one uploaded image for a product.
    ///
    /// `index` is the image's position within the upload batch; it keeps
    /// names unique when several files arrive in the same second.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::UnsupportedType` for file names without an
    /// accepted image extension, `MediaError::Io` if the write fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn store(
        &self,
        product_id: ProductId,
        index: usize,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, MediaError> {
        let ext = extension_of(original_name)
            .ok_or_else(|| MediaError::UnsupportedType(original_name.to_owned()))?;

        let dir = self.root.join(product_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}-{index}.{ext}", Utc::now().timestamp());
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;

        let url = format!("{}/{product_id}/{file_name}", self.base_url);
        tracing::info!(%url, "Stored product image");
        Ok(StoredImage { path, url })
    }
}

/// Lowercased extension, if it is an accepted image type.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_image_extensions() {
        assert_eq!(extension_of("photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("hero.webp").as_deref(), Some("webp"));
    }

    #[test]
    fn rejects_non_image_files() {
        assert!(extension_of("script.sh").is_none());
        assert!(extension_of("no-extension").is_none());
    }

    #[tokio::test]
    async fn stores_under_product_directory() {
        let tmp = std::env::temp_dir().join(format!("clover-media-{}", uuid::Uuid::new_v4()));
        let store = MediaStore::new(tmp.clone(), "http://localhost:3001/media".into());
        let product_id = ProductId::generate();

        let stored = store
            .store(product_id, 0, "front.png", b"not-a-real-png")
            .await
            .expect("store succeeds");

        assert!(stored.path.starts_with(tmp.join(product_id.to_string())));
        assert!(stored.url.starts_with("http://localhost:3001/media/"));
        assert!(stored.url.ends_with("-0.png"));
        assert_eq!(
            tokio::fs::read(&stored.path).await.expect("file exists"),
            b"not-a-real-png"
        );

        let _ = tokio::fs::remove_dir_all(&tmp).await;
    }
}
