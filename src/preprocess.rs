//! # Image Preprocessing Module
//!
//! This module prepares an incoming photo for OCR: decode, grayscale,
//! dimension bounding and a fixed contrast/brightness boost. The enhancement
//! constants are not user-configurable; the OCR provider's accuracy is
//! empirically sensitive to them.

use image::imageops::{self, FilterType};
use image::GrayImage;
use tracing::{debug, warn};

use crate::errors::ScanError;

/// Contrast boost factor applied around the midpoint
pub const CONTRAST_FACTOR: f32 = 2.0;
/// Mild brightness multiplier applied after the contrast boost
pub const BRIGHTNESS_FACTOR: f32 = 1.15;
/// Images with either dimension below this are upscaled 2x for OCR accuracy
pub const MIN_DIMENSION: u32 = 300;
/// Images with either dimension above this are downscaled 2x for performance
pub const MAX_DIMENSION: u32 = 2000;

// 3x3 box kernel; stands in for the stronger median denoise some OCR
// pipelines use, at a strength that does not smear small glyphs
const DENOISE_KERNEL: [f32; 9] = [
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
];

/// Decode raw image bytes and normalize them for OCR
///
/// Fails only when the bytes are not a supported raster format. Any decoded
/// image that cannot be enhanced (degenerate dimensions) is passed through
/// unmodified so OCR can still attempt a best-effort read.
pub fn normalize(bytes: &[u8]) -> Result<GrayImage, ScanError> {
    let decoded = image::load_from_memory(bytes)?;
    let gray = decoded.to_luma8();

    debug!(
        width = gray.width(),
        height = gray.height(),
        "Decoded image to grayscale"
    );

    Ok(enhance(gray))
}

/// Apply dimension bounding, contrast/brightness boost and mild denoise
fn enhance(img: GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        warn!("Degenerate image dimensions, skipping enhancement");
        return img;
    }

    let mut img = if width > MAX_DIMENSION || height > MAX_DIMENSION {
        debug!(width, height, "Downscaling oversized image 2x");
        imageops::resize(&img, width / 2, height / 2, FilterType::Lanczos3)
    } else if width < MIN_DIMENSION || height < MIN_DIMENSION {
        debug!(width, height, "Upscaling undersized image 2x");
        imageops::resize(&img, width * 2, height * 2, FilterType::Lanczos3)
    } else {
        img
    };

    for pixel in img.pixels_mut() {
        let v = pixel.0[0] as f32;
        let boosted = ((v - 128.0) * CONTRAST_FACTOR + 128.0) * BRIGHTNESS_FACTOR;
        pixel.0[0] = boosted.clamp(0.0, 255.0) as u8;
    }

    imageops::filter3x3(&img, &DENOISE_KERNEL)
}
