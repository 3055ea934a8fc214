//! Photo and burst data model for burstpick

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owned single-channel 8-bit pixel buffer, row-major.
///
/// Thumbnails can be large; they are handed to the scorers and dropped as
/// soon as scoring completes, never stored on a [`PhotoRecord`].
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Thumbnail {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize));
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Sample with replicated borders: coordinates outside the frame clamp
    /// to the nearest edge pixel, so convolution kernels never index out of
    /// bounds.
    pub fn sample_clamped(&self, x: i64, y: i64) -> u8 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}

/// Decode result for one RAW file: the capture instant with sub-second
/// precision plus the embedded grayscale preview.
#[derive(Debug, Clone)]
pub struct DecodedPhoto {
    pub timestamp: DateTime<Utc>,
    pub thumbnail: Thumbnail,
}

/// A single photo as it moves through the pipeline.
///
/// The raw sharpness and exposure scores are pure functions of the photo's
/// own thumbnail; only `combined_score` and `rating` depend on the other
/// members of the same burst.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub timestamp: DateTime<Utc>,
    /// Un-normalized weighted Laplacian variance. Set once by the scorer.
    pub sharpness_score: f64,
    /// Clipping-penalized exposure score in [0, 1]. Set once by the scorer.
    pub exposure_score: f64,
    /// Within-burst blend of the normalized scores. Set once by the combiner.
    pub combined_score: f64,
    /// Star rating. Set once by the selector.
    pub rating: Option<i64>,
}

impl PhotoRecord {
    pub fn new(
        path: PathBuf,
        timestamp: DateTime<Utc>,
        sharpness_score: f64,
        exposure_score: f64,
    ) -> Self {
        Self {
            path,
            timestamp,
            sharpness_score,
            exposure_score,
            combined_score: 0.0,
            rating: None,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A temporally contiguous run of photos, grouped because consecutive
/// capture gaps stay within the burst threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Burst {
    /// Members in ascending timestamp order.
    pub members: Vec<PhotoRecord>,
    /// Index of the winning member, set by the selector.
    pub winner_index: Option<usize>,
}

impl Burst {
    pub fn new(members: Vec<PhotoRecord>) -> Self {
        Self {
            members,
            winner_index: None,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.members.first().map(|p| p.timestamp)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.members.last().map(|p| p.timestamp)
    }

    pub fn winner(&self) -> Option<&PhotoRecord> {
        self.winner_index.and_then(|i| self.members.get(i))
    }
}
