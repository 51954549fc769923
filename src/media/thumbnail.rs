/// List thumbnails
use iced::widget::image::Handle;

use super::decode_fit_blocking;
use crate::api::ApiClient;
use crate::error::Result;

/// Size of displayed thumbnails (square box)
pub const THUMBNAIL_SIZE: u32 = 120;

/// Fetch and decode one thumbnail. Any error keeps the placeholder;
/// the caller still has to act on an expired session.
pub async fn load_thumbnail(api: ApiClient, url: String) -> Result<Handle> {
    let bytes = api.fetch_bytes(&url).await.inspect_err(|e| {
        if !e.is_silent() {
            tracing::debug!(%url, "thumbnail fetch failed: {e}");
        }
    })?;

    let pixels = decode_fit_blocking(bytes, THUMBNAIL_SIZE)
        .await
        .inspect_err(|e| tracing::debug!(%url, "thumbnail decode failed: {e}"))?;
    Ok(pixels.into_handle())
}
