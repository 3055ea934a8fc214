//! Chain-based burst grouping
//!
//! Photos are sorted by capture time and walked in order; a shot joins the
//! current burst when its gap to the immediately preceding shot stays
//! within the threshold. The gap is measured between consecutive shots,
//! not against the burst's first frame, so a long continuous shooting
//! session forms one group instead of being chopped into fixed windows.

use log::{debug, info, warn};

use crate::photo::{Burst, PhotoRecord};

/// Partition `records` into bursts using `threshold_secs` as the maximum
/// gap between consecutive shots. Every record lands in exactly one burst;
/// members come out in ascending timestamp order (ties keep scan order).
pub fn group_into_bursts(mut records: Vec<PhotoRecord>, threshold_secs: f64) -> Vec<Burst> {
    if records.is_empty() {
        warn!("no photos to group");
        return Vec::new();
    }
    info!(
        "grouping {} photos with a {}s gap threshold",
        records.len(),
        threshold_secs
    );

    // Stable sort: records with identical timestamps keep scan order.
    records.sort_by_key(|r| r.timestamp);

    let mut bursts: Vec<Burst> = Vec::new();
    let mut current: Vec<PhotoRecord> = Vec::new();

    for record in records {
        let starts_new_burst = match current.last() {
            Some(prev) => gap_seconds(prev, &record) > threshold_secs,
            None => false,
        };
        if starts_new_burst {
            bursts.push(Burst::new(std::mem::take(&mut current)));
        }
        current.push(record);
    }
    if !current.is_empty() {
        bursts.push(Burst::new(current));
    }

    debug!("created {} bursts", bursts.len());
    bursts
}

fn gap_seconds(prev: &PhotoRecord, next: &PhotoRecord) -> f64 {
    next.timestamp
        .signed_duration_since(prev.timestamp)
        .num_nanoseconds()
        .map(|n| n as f64 / 1e9)
        .unwrap_or(f64::INFINITY)
}
