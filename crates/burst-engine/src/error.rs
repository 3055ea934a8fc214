//! Error taxonomy for the burst engine
//!
//! Per-file failures ([`DecodeError`], [`WriteError`]) are recoverable: the
//! affected file is skipped or recorded and the run continues. Fatal errors
//! ([`ConfigError`], [`PipelineError::NoInput`]) abort before any scoring
//! or writing happens.

use thiserror::Error;

/// Invalid configuration values. Fatal; checked before any work starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("burst threshold must be a finite, non-negative number of seconds (got {0})")]
    InvalidThreshold(f64),

    #[error("{name} weight must be finite and non-negative (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("at least one of the sharpness and exposure weights must be positive")]
    ZeroWeights,

    #[error("rating {0} is outside the supported 0-5 star range")]
    InvalidRating(i64),
}

/// A single file could not be decoded. The file is excluded from grouping
/// and scoring; the run continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no embedded preview image found")]
    NoPreview,

    #[error("embedded preview could not be decoded: {0}")]
    BadPreview(String),

    #[error("metadata extraction failed: {0}")]
    Metadata(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A rating could not be written for a single file. Recorded for the final
/// summary; never aborts the run and never retried automatically.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("metadata writer is unavailable: {0}")]
    Unavailable(String),

    #[error("rating write failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fatal pipeline failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no decodable photos found in the input set")]
    NoInput,
}
