//! Burst grouping and image quality scoring library for burstpick
//!
//! This crate partitions a timestamp-ordered photo sequence into bursts,
//! scores each photo for sharpness and exposure from its embedded preview,
//! and picks the best frame per burst so the rest can be rated down and
//! culled without manual review.
//!
//! Decoding RAW files and writing ratings back into metadata are external
//! concerns, consumed through the [`RawDecoder`] and [`MetadataWriter`]
//! traits in [`pipeline`].

pub mod error;
pub mod group;
pub mod photo;
pub mod pipeline;
pub mod quality;
pub mod score;

pub use error::{ConfigError, DecodeError, PipelineError, WriteError};
pub use group::group_into_bursts;
pub use photo::{Burst, DecodedPhoto, PhotoRecord, Thumbnail};
pub use pipeline::{MetadataWriter, Pipeline, RawDecoder, RunReport};
pub use quality::{exposure_score, sharpness_score};

use serde::{Deserialize, Serialize};

/// Process-wide configuration, fixed at startup and passed explicitly into
/// every component so the scorers stay pure and independently testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum gap in seconds between consecutive shots of one burst.
    pub burst_threshold: f64,
    /// Blend weight for the normalized sharpness score.
    pub sharpness_weight: f64,
    /// Blend weight for the normalized exposure score.
    pub exposure_weight: f64,
    /// Per-pixel weight applied to the central region during sharpness
    /// scoring. 1.0 disables center emphasis.
    pub center_weight: f64,
    /// Star rating written to the winner of each burst.
    pub rating_best: i64,
    /// Star rating written to every other burst member.
    pub rating_rest: i64,
    /// Compute ratings but never hand them to the metadata writer.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            burst_threshold: 1.0,
            sharpness_weight: 0.7,
            exposure_weight: 0.3,
            center_weight: 1.5,
            rating_best: 5,
            rating_rest: 1,
            dry_run: false,
        }
    }
}

impl Config {
    /// Reject configurations the pipeline cannot run with. Called once
    /// before any scoring begins; violations are fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.burst_threshold.is_finite() || self.burst_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.burst_threshold));
        }
        for (name, value) in [
            ("sharpness", self.sharpness_weight),
            ("exposure", self.exposure_weight),
            ("center", self.center_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        if self.sharpness_weight == 0.0 && self.exposure_weight == 0.0 {
            return Err(ConfigError::ZeroWeights);
        }
        for rating in [self.rating_best, self.rating_rest] {
            if !(0..=5).contains(&rating) {
                return Err(ConfigError::InvalidRating(rating));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn negative_threshold_rejected() {
        let config = Config {
            burst_threshold: -1.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn non_finite_weight_rejected() {
        let config = Config {
            sharpness_weight: f64::NAN,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight { name: "sharpness", .. })
        ));
    }

    #[test]
    fn both_weights_zero_rejected() {
        let config = Config {
            sharpness_weight: 0.0,
            exposure_weight: 0.0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWeights)));
    }

    #[test]
    fn out_of_range_rating_rejected() {
        let config = Config {
            rating_best: 6,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRating(6))));
    }

    #[test]
    fn zero_center_weight_is_allowed() {
        let config = Config {
            center_weight: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
