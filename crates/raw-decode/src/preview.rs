//! Embedded preview extraction
//!
//! RAW files carry a camera-rendered JPEG preview; scoring runs on that
//! instead of decoding sensor data. `exiftool -b` pulls the preview bytes,
//! the `image` crate decodes them, and the result is converted to the
//! single-channel buffer the scorers expect. Oversized previews are
//! downscaled so scoring cost stays bounded.

use std::io::Cursor;
use std::path::Path;
use std::process::Command;

use image::{DynamicImage, GenericImageView, ImageReader};
use log::debug;

use burst_engine::{DecodeError, Thumbnail};

/// Long-edge cap applied before scoring.
const MAX_PREVIEW_EDGE: u32 = 1600;

/// Tags tried in order; `PreviewImage` is the full-size preview most RAW
/// formats embed, `ThumbnailImage` is the small fallback.
const PREVIEW_TAGS: [&str; 2] = ["PreviewImage", "ThumbnailImage"];

/// Extract the embedded preview of `path` as a grayscale thumbnail.
pub fn grayscale_preview(path: &Path) -> Result<Thumbnail, DecodeError> {
    let jpeg = extract_embedded_jpeg(path)?;

    let img = ImageReader::new(Cursor::new(&jpeg))
        .with_guessed_format()?
        .decode()
        .map_err(|e| DecodeError::BadPreview(e.to_string()))?;

    let img = limit_size(img);
    let gray = img.to_luma8();
    Ok(Thumbnail::new(gray.width(), gray.height(), gray.into_raw()))
}

/// Pull raw preview bytes out of the file, trying each known tag.
fn extract_embedded_jpeg(path: &Path) -> Result<Vec<u8>, DecodeError> {
    for tag in PREVIEW_TAGS {
        let output = Command::new("exiftool")
            .arg("-b")
            .arg(format!("-{tag}"))
            .arg(path)
            .output()?;

        if output.status.success() && !output.stdout.is_empty() {
            debug!(
                "extracted {} byte {} from {}",
                output.stdout.len(),
                tag,
                path.display()
            );
            return Ok(output.stdout);
        }
    }
    Err(DecodeError::NoPreview)
}

/// Downscale so the long edge fits [`MAX_PREVIEW_EDGE`]; small previews
/// are never upscaled.
fn limit_size(img: DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let long_edge = width.max(height);
    if long_edge <= MAX_PREVIEW_EDGE {
        return img;
    }
    let ratio = MAX_PREVIEW_EDGE as f64 / long_edge as f64;
    let new_width = (width as f64 * ratio).round() as u32;
    let new_height = (height as f64 * ratio).round() as u32;
    img.resize(new_width, new_height, image::imageops::FilterType::Triangle)
}
