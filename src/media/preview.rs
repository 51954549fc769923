/// Full preview shown in the overlay
use iced::widget::image::Handle;

use super::decode_fit_blocking;
use crate::api::ApiClient;
use crate::error::Result;

/// Bounding box of the preview image
pub const PREVIEW_SIZE: u32 = 400;

/// Fetch the medium-size rendition of a file for the preview overlay.
pub async fn load_preview(api: ApiClient, url: String) -> Result<Handle> {
    let bytes = api.fetch_bytes(&url).await?;
    let pixels = decode_fit_blocking(bytes, PREVIEW_SIZE).await?;
    tracing::debug!(%url, width = pixels.width, height = pixels.height, "preview decoded");
    Ok(pixels.into_handle())
}
