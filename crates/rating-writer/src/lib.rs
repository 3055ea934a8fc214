//! Star-rating metadata writer for burstpick
//!
//! Persists ratings through exiftool so no metadata format knowledge lives
//! in this codebase. Three tags are written for broad compatibility:
//!
//! - `XMP:Rating`: the standard tag, read by Lightroom, DigiKam, etc.
//! - `XMP:RatingPercent`: Microsoft-specific; without it Windows Explorer
//!   shows no stars in file properties.
//! - `Rating`: EXIF-level fallback.

use std::path::Path;
use std::process::Command;

use log::debug;

use burst_engine::{MetadataWriter, WriteError};

/// Windows Explorer maps 1-5 stars to these percent values; anything else
/// and the stars don't render.
pub fn rating_to_percent(rating: i64) -> i64 {
    match rating {
        1 => 1,
        2 => 25,
        3 => 50,
        4 => 75,
        5 => 99,
        _ => 0,
    }
}

/// True when `exiftool` can be spawned. Checked by the CLI before a
/// non-dry-run starts so a missing installation fails fast instead of
/// failing on every file.
pub fn exiftool_available() -> bool {
    Command::new("exiftool")
        .arg("-ver")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// [`MetadataWriter`] backed by an `exiftool` subprocess per file.
///
/// Stateless and safe to call from multiple worker threads; writes to
/// different files are fully independent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExiftoolWriter;

impl ExiftoolWriter {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataWriter for ExiftoolWriter {
    fn write_rating(&self, path: &Path, rating: i64) -> Result<(), WriteError> {
        // -overwrite_original prevents exiftool from leaving an _original
        // backup next to every rated file.
        let output = Command::new("exiftool")
            .arg("-overwrite_original")
            .arg(format!("-XMP:Rating={rating}"))
            .arg(format!("-XMP:RatingPercent={}", rating_to_percent(rating)))
            .arg(format!("-Rating={rating}"))
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    WriteError::Unavailable("exiftool is not installed or not in PATH".into())
                } else {
                    WriteError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(WriteError::Failed(format!(
                "exiftool exited with {} for {}: {}",
                output.status,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        debug!("wrote rating {} to {}", rating, path.display());
        Ok(())
    }
}
