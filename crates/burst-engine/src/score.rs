//! Within-burst score combination and winner selection
//!
//! Absolute sharpness and exposure magnitudes are not comparable across
//! lighting conditions or subjects, so both scores are min-max normalized
//! within the burst before blending. Raw scores are left untouched; only
//! `combined_score` and `rating` are written here.

use log::debug;

use crate::photo::Burst;
use crate::Config;

/// Normalize each member's raw scores within the burst and blend them into
/// `combined_score` using the configured weights. Weights need not sum to
/// 1; the comparison is always relative within one burst.
pub fn combine_scores(burst: &mut Burst, config: &Config) {
    if burst.is_empty() {
        return;
    }

    let sharpness: Vec<f64> = burst.members.iter().map(|p| p.sharpness_score).collect();
    let exposure: Vec<f64> = burst.members.iter().map(|p| p.exposure_score).collect();
    let norm_sharpness = min_max_normalize(&sharpness);
    let norm_exposure = min_max_normalize(&exposure);

    for (i, photo) in burst.members.iter_mut().enumerate() {
        photo.combined_score = config.sharpness_weight * norm_sharpness[i]
            + config.exposure_weight * norm_exposure[i];
    }
}

/// Min-max scale to [0, 1]. When every value is equal there is nothing to
/// rank on, so all members normalize to 1.0 (and no division by zero).
fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > min {
        values.iter().map(|v| (v - min) / (max - min)).collect()
    } else {
        vec![1.0; values.len()]
    }
}

/// Pick the member with the highest combined score, set `winner_index`,
/// and assign `rating_best` to the winner and `rating_rest` to everyone
/// else. Ties go to the earliest shot, which makes repeated runs over the
/// same input reproducible.
pub fn select_winner(burst: &mut Burst, config: &Config) {
    if burst.is_empty() {
        return;
    }

    let mut winner = 0usize;
    for (i, photo) in burst.members.iter().enumerate().skip(1) {
        // Members are in ascending timestamp order, so on an exact tie the
        // incumbent (earlier shot) stands.
        if photo.combined_score > burst.members[winner].combined_score {
            winner = i;
        }
    }

    for (i, photo) in burst.members.iter_mut().enumerate() {
        photo.rating = Some(if i == winner {
            config.rating_best
        } else {
            config.rating_rest
        });
    }
    burst.winner_index = Some(winner);
    debug!(
        "burst of {} photos: winner {}",
        burst.len(),
        burst.members[winner].file_name()
    );
}
