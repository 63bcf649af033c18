//! Best-effort photo enrichment: re-host the largest variant and link it
//! from the note. Every failure here degrades to a text-only capture.

use {async_trait::async_trait, tracing::{debug, info, warn}};

use crate::{
    Result,
    normalize::append_paragraph,
    types::{InboundEvent, MediaReference, NormalizedCapture},
};

/// Extension hint passed to the uploader for photos.
pub const PHOTO_EXTENSION: &str = ".jpg";

/// Content used when a photo arrives without any text.
pub const IMAGE_PLACEHOLDER: &str = "Image from Telegram";

/// File access offered by the event source.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Turn an opaque media locator into a direct download URL.
    async fn resolve_url(&self, locator: &str) -> Result<String>;

    /// Download raw bytes from a resolved URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Object storage for re-hosted media.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Whether uploads are possible at all. Checked once per event before
    /// normalization.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn upload(&self, data: Vec<u8>, extension: &str) -> Result<MediaReference>;
}

/// Uploader used when no object storage is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledUploader;

#[async_trait]
impl MediaUploader for DisabledUploader {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn upload(&self, _data: Vec<u8>, _extension: &str) -> Result<MediaReference> {
        Err(crate::Error::message("media uploads are not configured"))
    }
}

/// Re-host the photo attached to `event`.
///
/// Returns `None` when there is no photo or any step fails; failures are
/// logged and never propagated.
pub async fn upload_photo(
    event: &InboundEvent,
    source: &dyn MediaSource,
    uploader: &dyn MediaUploader,
) -> Option<MediaReference> {
    let variant = event.photo()?.largest()?;

    let url = match source.resolve_url(&variant.locator).await {
        Ok(url) => url,
        Err(e) => {
            warn!(locator = %variant.locator, error = %e, "failed to resolve photo URL, capturing text only");
            return None;
        },
    };

    let data = match source.fetch(&url).await {
        Ok(data) => data,
        Err(e) => {
            warn!(locator = %variant.locator, error = %e, "failed to download photo, capturing text only");
            return None;
        },
    };
    debug!(locator = %variant.locator, size = data.len(), "downloaded photo");

    match uploader.upload(data, PHOTO_EXTENSION).await {
        Ok(reference) => {
            info!(reference = %reference.reference_url, "uploaded photo");
            Some(reference)
        },
        Err(e) => {
            warn!(locator = %variant.locator, error = %e, "failed to upload photo, capturing text only");
            None
        },
    }
}

/// Splice an uploaded media reference into `capture`.
pub fn attach_reference(capture: &mut NormalizedCapture, reference: &MediaReference) {
    append_paragraph(
        &mut capture.note,
        &format!("Image: {}", reference.display_url),
    );
    if capture.content.is_empty() {
        capture.content = IMAGE_PLACEHOLDER.to_string();
    }
}
