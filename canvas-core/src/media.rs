//! Media source collaborator: permission plus image picker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// Answer to a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Access allowed.
    Granted,
    /// Access refused.
    Denied,
}

impl Permission {
    /// Whether access was allowed.
    #[must_use]
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// An asset returned by the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Opaque reference the renderer can resolve.
    pub uri: String,
}

/// Outcome of presenting the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum PickResult {
    /// The user backed out.
    Canceled,
    /// The user picked one or more assets.
    Picked {
        /// Picked assets, first one wins.
        assets: Vec<MediaAsset>,
    },
}

/// Source of images for new image elements (a photo library, file dialog, ...).
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Ask for read access.
    async fn request_permission(&self) -> Permission;

    /// Present the picker.
    async fn pick_image(&self) -> PickResult;
}

/// Run the permission and picker flow.
///
/// Returns the picked source reference, or `None` if the user canceled or
/// picked nothing.
///
/// # Errors
///
/// Returns [`CanvasError::MediaPermissionDenied`] if read access is refused.
pub async fn pick_image_source(source: &dyn MediaSource) -> CanvasResult<Option<String>> {
    if !source.request_permission().await.is_granted() {
        tracing::warn!("Media library permission denied");
        return Err(CanvasError::MediaPermissionDenied);
    }
    match source.pick_image().await {
        PickResult::Canceled => {
            tracing::debug!("Image picker canceled");
            Ok(None)
        }
        PickResult::Picked { assets } => Ok(assets.into_iter().next().map(|asset| asset.uri)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        permission: Permission,
        result: PickResult,
    }

    #[async_trait]
    impl MediaSource for FakeSource {
        async fn request_permission(&self) -> Permission {
            self.permission
        }

        async fn pick_image(&self) -> PickResult {
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_picked_first_asset_wins() {
        let source = FakeSource {
            permission: Permission::Granted,
            result: PickResult::Picked {
                assets: vec![
                    MediaAsset {
                        uri: "file:///a.png".to_string(),
                    },
                    MediaAsset {
                        uri: "file:///b.png".to_string(),
                    },
                ],
            },
        };
        let picked = pick_image_source(&source).await.expect("picked");
        assert_eq!(picked.as_deref(), Some("file:///a.png"));
    }

    #[tokio::test]
    async fn test_empty_pick_is_cancel() {
        let source = FakeSource {
            permission: Permission::Granted,
            result: PickResult::Picked { assets: vec![] },
        };
        assert_eq!(pick_image_source(&source).await.expect("ok"), None);
    }

    #[tokio::test]
    async fn test_denied_permission_errors() {
        let source = FakeSource {
            permission: Permission::Denied,
            result: PickResult::Canceled,
        };
        let result = pick_image_source(&source).await;
        assert!(matches!(result, Err(CanvasError::MediaPermissionDenied)));
    }
}
