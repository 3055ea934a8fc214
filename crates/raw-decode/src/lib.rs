//! RAW decoding collaborator for burstpick
//!
//! Extracts what the scoring engine needs from a RAW file without touching
//! sensor data: the capture instant (with sub-second precision) and the
//! embedded JPEG preview, decoded to grayscale. Format knowledge lives in
//! exiftool; this crate only shells out to it and decodes the extracted
//! JPEG with the `image` crate.

pub mod exif;
pub mod preview;

use std::path::Path;
use std::process::Command;

use burst_engine::{DecodeError, DecodedPhoto, RawDecoder};

/// [`RawDecoder`] backed by an `exiftool` subprocess per file.
///
/// Stateless; safe to call from multiple rayon workers at once, each call
/// spawns its own subprocesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExiftoolDecoder;

impl ExiftoolDecoder {
    pub fn new() -> Self {
        Self
    }

    /// True when `exiftool` can be spawned at all.
    pub fn available() -> bool {
        Command::new("exiftool")
            .arg("-ver")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}

impl RawDecoder for ExiftoolDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedPhoto, DecodeError> {
        let timestamp = exif::capture_time(path)?;
        let thumbnail = preview::grayscale_preview(path)?;
        Ok(DecodedPhoto {
            timestamp,
            thumbnail,
        })
    }
}
