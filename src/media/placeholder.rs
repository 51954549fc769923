/// Inline placeholder graphic
///
/// A light tile with a sun and two hills, drawn once and shared by every
/// slot that has no real thumbnail.

use iced::widget::image::Handle;
use image::{Rgba, RgbaImage};
use once_cell::sync::Lazy;

use super::thumbnail::THUMBNAIL_SIZE;

const BACKGROUND: Rgba<u8> = Rgba([0xF1, 0xF5, 0xF9, 0xFF]);
const SHAPE: Rgba<u8> = Rgba([0xD8, 0xE1, 0xE6, 0xFF]);

static PLACEHOLDER: Lazy<Handle> = Lazy::new(|| {
    let img = draw(THUMBNAIL_SIZE);
    Handle::from_rgba(img.width(), img.height(), img.into_raw())
});

/// Shared placeholder handle.
pub fn handle() -> Handle {
    PLACEHOLDER.clone()
}

/// Draw the placeholder at `size`×`size`.
pub fn draw(size: u32) -> RgbaImage {
    let s = size as f32;
    let sun = (s * 0.7, s * 0.3, s * 0.1);
    let hills = [(s * 0.3, s * 0.55), (s * 0.65, s * 0.45)];

    RgbaImage::from_fn(size, size, |x, y| {
        let (x, y) = (x as f32 + 0.5, y as f32 + 0.5);

        let (cx, cy, r) = sun;
        if (x - cx).powi(2) + (y - cy).powi(2) <= r * r {
            return SHAPE;
        }

        // each hill is a triangle peaking at (px, py) with 45° slopes
        let on_hill = hills.iter().any(|&(px, py)| y >= py + (x - px).abs() && y < s * 0.85);
        if on_hill {
            SHAPE
        } else {
            BACKGROUND
        }
    })
}
