/// Image decoding module
///
/// This module handles:
/// - Fetching thumbnail and preview bytes from the server
/// - Decoding and downscaling them off the UI thread
/// - The inline placeholder shown until (or instead of) a real thumbnail

pub mod placeholder;
pub mod preview;
pub mod thumbnail;

use image::imageops::FilterType;

use crate::error::{AdminError, Result};

/// Decoded RGBA pixels ready for an iced image handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Pixels {
    pub fn into_handle(self) -> iced::widget::image::Handle {
        iced::widget::image::Handle::from_rgba(self.width, self.height, self.rgba)
    }
}

/// Decode `bytes` and shrink to fit a `max`×`max` box, keeping the aspect
/// ratio. Smaller images are left as they are.
pub fn decode_fit(bytes: &[u8], max: u32) -> Result<Pixels> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AdminError::MalformedResponse(format!("undecodable image: {e}")))?;

    let img = if img.width() > max || img.height() > max {
        img.resize(max, max, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(Pixels {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// `decode_fit` on the blocking pool.
pub async fn decode_fit_blocking(bytes: Vec<u8>, max: u32) -> Result<Pixels> {
    tokio::task::spawn_blocking(move || decode_fit(&bytes, max))
        .await
        .map_err(|e| AdminError::Io(format!("decode task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use std::io::Cursor;

    /// PNG of the given size, filled with one colour.
    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([200u8, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_fit_downscales() {
        let pixels = decode_fit(&png(600, 300), 120).unwrap();
        assert_eq!((pixels.width, pixels.height), (120, 60));
        assert_eq!(pixels.rgba.len(), 120 * 60 * 4);
    }

    #[test]
    fn test_decode_fit_keeps_small_images() {
        let pixels = decode_fit(&png(40, 30), 120).unwrap();
        assert_eq!((pixels.width, pixels.height), (40, 30));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_fit(b"not an image", 120).unwrap_err();
        assert!(matches!(err, AdminError::MalformedResponse(_)));
    }
}
