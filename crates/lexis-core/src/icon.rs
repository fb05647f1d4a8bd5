use std::io::Cursor;
use std::sync::Arc;

use image::ImageReader;
use lexis_config::icon::IconConfig;
use lexis_types::{Icon, IconView, NewIcon, Requester};

use crate::blob::BlobStore;
use crate::error::MediaError;
use crate::store::Repository;

const BUCKET: &str = "icons";

/// Validated upload: detected extension and pixel size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub ext: &'static str,
    pub width: u32,
    pub height: u32,
}

/// User-submitted entry icons, moderated by administrators
pub struct IconStore {
    repo: Arc<dyn Repository>,
    blobs: Arc<BlobStore>,
    bounds: IconConfig,
}

impl IconStore {
    pub fn new(repo: Arc<dyn Repository>, blobs: Arc<BlobStore>, bounds: IconConfig) -> Self {
        Self {
            repo,
            blobs,
            bounds,
        }
    }

    /// Check that `bytes` decode to an image within the configured bounds
    pub fn validate(&self, bytes: &[u8]) -> Result<ImageInfo, MediaError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;

        let Some(format) = reader.format() else {
            return Err(MediaError::InvalidInput("unrecognized image format".to_string()));
        };
        let ext = format.extensions_str().first().copied().unwrap_or("img");

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| MediaError::InvalidInput(format!("unreadable image: {e}")))?;

        if width > self.bounds.max_width {
            return Err(MediaError::InvalidInput(format!(
                "icon is {width}px wide, at most {}px allowed",
                self.bounds.max_width
            )));
        }

        if height != self.bounds.required_height {
            return Err(MediaError::InvalidInput(format!(
                "icon is {height}px high, exactly {}px required",
                self.bounds.required_height
            )));
        }

        Ok(ImageInfo { ext, width, height })
    }

    /// Attach an icon to `entry_id`.
    ///
    /// Administrator uploads are approved immediately, everyone else's wait
    /// for moderation. Nothing is stored unless every check passes.
    pub async fn upload(
        &self,
        entry_id: &str,
        image: &[u8],
        requester: &Requester,
    ) -> Result<Icon, MediaError> {
        if !requester.can_upload() {
            return Err(MediaError::PermissionDenied(format!(
                "{} must be verified to upload icons",
                requester.username
            )));
        }

        if self.repo.entry(entry_id).await.is_none() {
            return Err(MediaError::EntryNotFound(entry_id.to_string()));
        }

        let info = self.validate(image)?;
        let blob = self.blobs.put(BUCKET, info.ext, image).await?;

        let icon = self
            .repo
            .insert_icon(NewIcon {
                entry_id: entry_id.to_string(),
                path: blob.path,
                content_hash: blob.content_hash,
                approved: requester.is_administrator,
                uploaded_by: requester.username.clone(),
            })
            .await?;

        tracing::info!(
            "Icon {} uploaded for {} by {} (approved: {})",
            icon.id,
            entry_id,
            requester.username,
            icon.approved
        );

        Ok(icon)
    }

    /// Swap the image of an existing icon.
    ///
    /// Unchanged content is a no-op. Changed content from a non-administrator
    /// sends the icon back to moderation.
    pub async fn replace(
        &self,
        id: u64,
        image: &[u8],
        requester: &Requester,
    ) -> Result<Icon, MediaError> {
        let mut icon = self.repo.icon(id).await.ok_or(MediaError::IconNotFound(id))?;

        if !requester.is_administrator && requester.username != icon.uploaded_by {
            return Err(MediaError::PermissionDenied(format!(
                "{} cannot replace icon {id}",
                requester.username
            )));
        }

        let info = self.validate(image)?;
        let blob = self.blobs.put(BUCKET, info.ext, image).await?;

        if !icon.rehash(blob.content_hash, blob.path) {
            return Ok(icon);
        }

        icon.approved = requester.is_administrator;
        Ok(self.repo.update_icon(icon).await?)
    }

    /// Mark an icon as approved. Administrator only, idempotent.
    pub async fn approve(&self, id: u64, requester: &Requester) -> Result<Icon, MediaError> {
        if !requester.is_administrator {
            return Err(MediaError::PermissionDenied(format!(
                "{} cannot approve icons",
                requester.username
            )));
        }

        let mut icon = self.repo.icon(id).await.ok_or(MediaError::IconNotFound(id))?;

        if icon.approved {
            return Ok(icon);
        }

        icon.approved = true;
        let icon = self.repo.update_icon(icon).await?;
        tracing::info!("Icon {} approved by {}", icon.id, requester.username);

        Ok(icon)
    }

    /// Icons waiting for moderation
    pub async fn pending(&self, requester: &Requester) -> Result<Vec<Icon>, MediaError> {
        if !requester.is_administrator {
            return Err(MediaError::PermissionDenied(format!(
                "{} cannot list pending icons",
                requester.username
            )));
        }

        Ok(self.repo.pending_icons().await)
    }

    /// Icons of an entry as shown to a caller; unapproved ones only when `privileged`
    pub async fn icons_for(&self, entry_id: &str, privileged: bool) -> Vec<IconView> {
        self.repo
            .icons_for_entry(entry_id)
            .await
            .iter()
            .filter(|icon| privileged || icon.approved)
            .map(Icon::view)
            .collect()
    }
}
