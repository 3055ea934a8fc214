//! Pipeline orchestrator
//!
//! Sequences decode -> score -> group -> combine -> select -> write.
//! Decoding and scoring are pure per-photo work and run on the rayon pool;
//! grouping is a whole-set operation and runs once after every decode
//! result is in; combination and selection are per-burst and independent
//! across bursts; rating writes are per-file and independent across files.
//!
//! Per-file failures never abort the batch: a file that fails to decode is
//! excluded from grouping, a file that fails to write is counted for the
//! final summary, and the run continues either way.

use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{ConfigError, DecodeError, PipelineError, WriteError};
use crate::photo::{Burst, DecodedPhoto, PhotoRecord};
use crate::{group, quality, score, Config};

/// Decodes one RAW file into its capture timestamp and embedded grayscale
/// preview. Implementations must be callable from multiple worker threads.
pub trait RawDecoder: Sync {
    fn decode(&self, path: &Path) -> Result<DecodedPhoto, DecodeError>;
}

/// Persists a star rating into a file's metadata. Failures are per-file
/// and must not affect writes to other files.
pub trait MetadataWriter: Sync {
    fn write_rating(&self, path: &Path, rating: i64) -> Result<(), WriteError>;
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// All bursts, fully scored and selected.
    pub bursts: Vec<Burst>,
    /// Photos that decoded and were scored.
    pub scored: usize,
    /// Files skipped because decoding failed.
    pub decode_failures: usize,
    /// Ratings successfully written (always 0 in dry-run mode).
    pub ratings_written: usize,
    /// Ratings that failed to write.
    pub write_failures: usize,
    pub dry_run: bool,
}

impl RunReport {
    /// The `(path, rating)` assignments this run produced, in burst order.
    /// Identical input and configuration always yield identical pairs.
    pub fn rating_pairs(&self) -> Vec<(PathBuf, i64)> {
        self.bursts
            .iter()
            .flat_map(|b| b.members.iter())
            .filter_map(|p| p.rating.map(|r| (p.path.clone(), r)))
            .collect()
    }
}

/// Drives the full decode -> score -> group -> select -> write sequence.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Validates the configuration up front; invalid values are fatal
    /// before any file is touched.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run<D, W>(
        &self,
        paths: &[PathBuf],
        decoder: &D,
        writer: &W,
    ) -> Result<RunReport, PipelineError>
    where
        D: RawDecoder,
        W: MetadataWriter,
    {
        info!("decoding and scoring {} files", paths.len());

        // Scoring is a pure function of each photo's own thumbnail, so the
        // whole decode+score step fans out across the worker pool. The
        // thumbnail is dropped as soon as both scores are computed.
        let outcomes: Vec<Result<PhotoRecord, DecodeError>> = paths
            .par_iter()
            .map(|path| {
                decoder.decode(path).map(|decoded| {
                    let sharpness =
                        quality::sharpness_score(&decoded.thumbnail, self.config.center_weight);
                    let exposure = quality::exposure_score(&decoded.thumbnail);
                    PhotoRecord::new(path.clone(), decoded.timestamp, sharpness, exposure)
                })
            })
            .collect();

        let mut records = Vec::with_capacity(paths.len());
        let mut decode_failures = 0usize;
        for (path, outcome) in paths.iter().zip(outcomes) {
            match outcome {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    decode_failures += 1;
                }
            }
        }

        if records.is_empty() {
            return Err(PipelineError::NoInput);
        }
        let scored = records.len();

        let mut bursts = group::group_into_bursts(records, self.config.burst_threshold);

        // Combination reads every member of a burst, so parallelism stops
        // at the burst boundary.
        bursts.par_iter_mut().for_each(|burst| {
            score::combine_scores(burst, &self.config);
            score::select_winner(burst, &self.config);
        });

        let (ratings_written, write_failures) = if self.config.dry_run {
            info!("dry run: {} ratings computed, none written", scored);
            (0, 0)
        } else {
            self.write_ratings(&bursts, writer)
        };

        Ok(RunReport {
            bursts,
            scored,
            decode_failures,
            ratings_written,
            write_failures,
            dry_run: self.config.dry_run,
        })
    }

    fn write_ratings<W: MetadataWriter>(&self, bursts: &[Burst], writer: &W) -> (usize, usize) {
        let members: Vec<&PhotoRecord> = bursts.iter().flat_map(|b| b.members.iter()).collect();
        let outcomes: Vec<Result<(), WriteError>> = members
            .par_iter()
            .map(|photo| {
                let rating = photo.rating.unwrap_or(self.config.rating_rest);
                writer.write_rating(&photo.path, rating)
            })
            .collect();

        let mut written = 0usize;
        let mut failed = 0usize;
        for (photo, outcome) in members.iter().zip(outcomes) {
            match outcome {
                Ok(()) => written += 1,
                Err(e) => {
                    warn!("failed to write rating for {}: {}", photo.path.display(), e);
                    failed += 1;
                }
            }
        }
        (written, failed)
    }
}
