//! Per-photo quality scorers
//!
//! Both scorers are pure functions of a single grayscale thumbnail, which
//! makes them embarrassingly parallel across photos: no photo reads or
//! writes another photo's state during scoring.

use crate::photo::Thumbnail;

/// Intensities at or above this count as clipped highlights.
pub const HIGHLIGHT_CLIP_MIN: u8 = 250;
/// Intensities at or below this count as crushed shadows.
pub const SHADOW_CLIP_MAX: u8 = 4;

/// Blown highlights lose detail that cannot be recovered, so even a small
/// clipped fraction drops the score hard.
const HIGHLIGHT_PENALTY: f64 = 5.0;
/// Crushed shadows are penalized more gently than highlights.
const SHADOW_PENALTY: f64 = 2.0;

/// Sharpness as the weighted variance of the 3x3 Laplacian response.
///
/// Pixels inside the centered 50%-width x 50%-height rectangle carry
/// `center_weight`; all others carry 1.0. With `center_weight = 1.0` this
/// is exactly the classic unweighted Laplacian-variance sharpness metric.
/// Border pixels use replicated sampling, never out-of-bounds access.
pub fn sharpness_score(thumb: &Thumbnail, center_weight: f64) -> f64 {
    let (w, h) = (thumb.width as i64, thumb.height as i64);
    if w == 0 || h == 0 {
        return 0.0;
    }

    // Laplacian kernel:
    //   [ 0  1  0 ]
    //   [ 1 -4  1 ]
    //   [ 0  1  0 ]
    let mut response = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            let lap = thumb.sample_clamped(x, y - 1) as f64
                + thumb.sample_clamped(x, y + 1) as f64
                + thumb.sample_clamped(x - 1, y) as f64
                + thumb.sample_clamped(x + 1, y) as f64
                - 4.0 * thumb.sample_clamped(x, y) as f64;
            response.push(lap);
        }
    }

    let (cx0, cx1) = (w / 4, w / 4 + w / 2);
    let (cy0, cy1) = (h / 4, h / 4 + h / 2);
    let weight_at = |x: i64, y: i64| -> f64 {
        if x >= cx0 && x < cx1 && y >= cy0 && y < cy1 {
            center_weight
        } else {
            1.0
        }
    };

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut i = 0;
    for y in 0..h {
        for x in 0..w {
            let wt = weight_at(x, y);
            weighted_sum += wt * response[i];
            total_weight += wt;
            i += 1;
        }
    }
    if total_weight <= 0.0 {
        return 0.0;
    }
    let mean = weighted_sum / total_weight;

    let mut weighted_sq_dev = 0.0;
    let mut i = 0;
    for y in 0..h {
        for x in 0..w {
            let dev = response[i] - mean;
            weighted_sq_dev += weight_at(x, y) * dev * dev;
            i += 1;
        }
    }
    weighted_sq_dev / total_weight
}

/// Exposure quality in [0, 1] from the intensity histogram.
///
/// 1.0 means no clipped highlights and no crushed shadows; the score falls
/// steeply as either clipped fraction grows, bottoming out at 0.0.
pub fn exposure_score(thumb: &Thumbnail) -> f64 {
    if thumb.is_empty() {
        return 0.0;
    }

    let mut histogram = [0u64; 256];
    for &p in &thumb.pixels {
        histogram[p as usize] += 1;
    }
    let total = thumb.len() as f64;

    let highlights: u64 = histogram[HIGHLIGHT_CLIP_MIN as usize..].iter().sum();
    let shadows: u64 = histogram[..=SHADOW_CLIP_MAX as usize].iter().sum();

    let highlight_fraction = highlights as f64 / total;
    let shadow_fraction = shadows as f64 / total;

    let score = 1.0 - HIGHLIGHT_PENALTY * highlight_fraction - SHADOW_PENALTY * shadow_fraction;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 100x100 frame, high-contrast square in the middle. Optionally box
    /// blurred to simulate a missed-focus frame.
    fn synthetic_frame(sharp: bool) -> Thumbnail {
        let (w, h) = (100usize, 100usize);
        let mut pixels = vec![0u8; w * h];
        for y in 25..75 {
            for x in 25..75 {
                pixels[y * w + x] = 255;
            }
        }
        if !sharp {
            // Cheap 9x9 box blur, enough to flatten the edges.
            let src = pixels.clone();
            for y in 0..h {
                for x in 0..w {
                    let mut sum = 0u32;
                    let mut count = 0u32;
                    for dy in -4i64..=4 {
                        for dx in -4i64..=4 {
                            let sx = (x as i64 + dx).clamp(0, w as i64 - 1) as usize;
                            let sy = (y as i64 + dy).clamp(0, h as i64 - 1) as usize;
                            sum += src[sy * w + sx] as u32;
                            count += 1;
                        }
                    }
                    pixels[y * w + x] = (sum / count) as u8;
                }
            }
        }
        Thumbnail::new(w as u32, h as u32, pixels)
    }

    fn uniform(w: u32, h: u32, value: u8) -> Thumbnail {
        Thumbnail::new(w, h, vec![value; (w * h) as usize])
    }

    #[test]
    fn sharp_frame_outscores_blurred_frame() {
        let sharp = sharpness_score(&synthetic_frame(true), 1.0);
        let blurry = sharpness_score(&synthetic_frame(false), 1.0);
        assert!(
            sharp > blurry * 2.0,
            "sharp {sharp} should dominate blurry {blurry}"
        );
    }

    #[test]
    fn unit_center_weight_matches_plain_variance() {
        let thumb = synthetic_frame(true);

        // Reference: unweighted Laplacian variance over the same buffer.
        let (w, h) = (thumb.width as i64, thumb.height as i64);
        let mut response = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let lap = thumb.sample_clamped(x, y - 1) as f64
                    + thumb.sample_clamped(x, y + 1) as f64
                    + thumb.sample_clamped(x - 1, y) as f64
                    + thumb.sample_clamped(x + 1, y) as f64
                    - 4.0 * thumb.sample_clamped(x, y) as f64;
                response.push(lap);
            }
        }
        let n = response.len() as f64;
        let mean = response.iter().sum::<f64>() / n;
        let variance = response.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n;

        let scored = sharpness_score(&thumb, 1.0);
        assert!((scored - variance).abs() < 1e-9);
    }

    #[test]
    fn center_weight_discounts_edge_only_detail() {
        // Sharp detail only in the corners; the center is completely flat.
        let (w, h) = (100usize, 100usize);
        let mut pixels = vec![0u8; w * h];
        for y in 0..10 {
            for x in 0..10 {
                pixels[y * w + x] = 255;
                pixels[(h - 1 - y) * w + (w - 1 - x)] = 255;
            }
        }
        let thumb = Thumbnail::new(w as u32, h as u32, pixels);

        let unweighted = sharpness_score(&thumb, 1.0);
        let weighted = sharpness_score(&thumb, 10.0);
        assert!(
            weighted < unweighted,
            "weighting a flat center should lower the score"
        );
    }

    #[test]
    fn center_weight_rewards_centered_detail() {
        let thumb = synthetic_frame(true);
        let unweighted = sharpness_score(&thumb, 1.0);
        let weighted = sharpness_score(&thumb, 10.0);
        assert!(weighted > unweighted);
    }

    #[test]
    fn degenerate_buffers_score_zero() {
        assert_eq!(sharpness_score(&Thumbnail::new(0, 0, vec![]), 1.5), 0.0);
        // A flat frame has zero Laplacian response everywhere.
        assert_eq!(sharpness_score(&uniform(8, 8, 128), 1.5), 0.0);
    }

    #[test]
    fn clean_midtone_frame_scores_perfect_exposure() {
        assert_eq!(exposure_score(&uniform(50, 50, 128)), 1.0);
        // Near-clipping values are still fine on either side.
        assert_eq!(exposure_score(&uniform(50, 50, 249)), 1.0);
        assert_eq!(exposure_score(&uniform(50, 50, 5)), 1.0);
    }

    #[test]
    fn clipping_drops_exposure_score() {
        let mut pixels = vec![128u8; 100 * 100];
        // 10% blown highlights.
        for p in pixels.iter_mut().take(1000) {
            *p = 255;
        }
        let blown = Thumbnail::new(100, 100, pixels);
        let score = exposure_score(&blown);
        assert!((score - 0.5).abs() < 1e-9, "5.0 * 0.10 penalty, got {score}");
    }

    #[test]
    fn highlights_penalized_harder_than_shadows() {
        let mut blown = vec![128u8; 100 * 100];
        let mut crushed = vec![128u8; 100 * 100];
        for i in 0..1000 {
            blown[i] = 255;
            crushed[i] = 0;
        }
        let blown_score = exposure_score(&Thumbnail::new(100, 100, blown));
        let crushed_score = exposure_score(&Thumbnail::new(100, 100, crushed));
        assert!(crushed_score > blown_score);
    }

    #[test]
    fn exposure_score_is_monotonic_in_clipped_fraction() {
        let mut previous = f64::INFINITY;
        for clipped in [0usize, 100, 500, 1000, 1500] {
            let mut pixels = vec![128u8; 100 * 100];
            for p in pixels.iter_mut().take(clipped) {
                *p = 255;
            }
            let score = exposure_score(&Thumbnail::new(100, 100, pixels));
            assert!(score <= previous);
            previous = score;
        }
    }

    #[test]
    fn fully_clipped_frame_scores_zero() {
        assert_eq!(exposure_score(&uniform(50, 50, 255)), 0.0);
    }
}
