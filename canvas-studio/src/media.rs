//! Media source backed by the script.

use async_trait::async_trait;
use canvas_core::{MediaAsset, MediaSource, Permission, PickResult};

/// Answers the permission prompt and picker with values from an
/// `add_image` command.
#[derive(Debug, Clone)]
pub struct ScriptedMedia {
    permission: Permission,
    source: Option<String>,
}

impl ScriptedMedia {
    /// A picker that returns `source`, or cancels if there is none.
    #[must_use]
    pub fn new(permission: Permission, source: Option<String>) -> Self {
        Self { permission, source }
    }
}

#[async_trait]
impl MediaSource for ScriptedMedia {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn pick_image(&self) -> PickResult {
        match &self.source {
            Some(uri) => PickResult::Picked {
                assets: vec![MediaAsset { uri: uri.clone() }],
            },
            None => PickResult::Canceled,
        }
    }
}
