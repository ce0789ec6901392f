//! Persistence collaborator: gallery permission plus album storage.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use canvas_core::Permission;

use crate::capture::ImageArtifact;
use crate::error::{RenderError, RenderResult};

/// Where a saved artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    /// Platform location of the stored asset.
    pub location: String,
}

/// Destination for exported images (a photo gallery, a folder, ...).
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Ask for write access.
    async fn request_permission(&self) -> Permission;

    /// Store the artifact in the named album, creating the album if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be stored.
    async fn save(&self, artifact: &ImageArtifact, album: &str) -> RenderResult<SavedAsset>;
}

/// Saves PNG artifacts into `<root>/<album>/`.
#[derive(Debug)]
pub struct AlbumDirectory {
    root: PathBuf,
    permission: Permission,
    counter: AtomicU64,
}

impl AlbumDirectory {
    /// Create a store rooted at `root`. Write access is granted.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            permission: Permission::Granted,
            counter: AtomicU64::new(0),
        }
    }

    /// Override the answer given to permission requests.
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory backing the named album.
    #[must_use]
    pub fn album_path(&self, album: &str) -> PathBuf {
        self.root.join(sanitize_filename(album))
    }
}

#[async_trait]
impl Persistence for AlbumDirectory {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn save(&self, artifact: &ImageArtifact, album: &str) -> RenderResult<SavedAsset> {
        let dir = self.album_path(album);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            RenderError::Persist(format!("Failed to create album {}: {e}", dir.display()))
        })?;

        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let path = dir.join(format!("export-{}-{n}.png", current_timestamp_ms()));
        tokio::fs::write(&path, &artifact.bytes)
            .await
            .map_err(|e| RenderError::Persist(format!("Failed to write {}: {e}", path.display())))?;

        tracing::debug!("Wrote {} bytes to {}", artifact.bytes.len(), path.display());
        Ok(SavedAsset {
            location: path.display().to_string(),
        })
    }
}

/// Replace anything but alphanumerics, `-` and `_` so the album name stays
/// one path component.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Get the current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
