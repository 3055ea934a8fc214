//! Capture-time extraction from EXIF metadata
//!
//! Reads `DateTimeOriginal` and `SubSecTimeOriginal` through
//! `exiftool -json`. Burst frames often share the same whole second, so
//! the sub-second tag is folded into the timestamp's nanoseconds; without
//! it the grouper could not order frames inside a burst.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use log::debug;
use serde::Deserialize;

use burst_engine::DecodeError;

#[derive(Deserialize)]
struct ExiftoolEntry {
    #[serde(rename = "DateTimeOriginal")]
    date_time_original: Option<String>,
    // exiftool emits this as a string or a bare number depending on the
    // camera, so take it as a raw JSON value.
    #[serde(rename = "SubSecTimeOriginal", default)]
    subsec_time_original: Option<serde_json::Value>,
}

/// Read the capture instant for `path`, falling back to the file's
/// modification time when the EXIF tag is missing or unparseable.
pub fn capture_time(path: &Path) -> Result<DateTime<Utc>, DecodeError> {
    let output = Command::new("exiftool")
        .args(["-json", "-fast2", "-DateTimeOriginal", "-SubSecTimeOriginal"])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(DecodeError::Metadata(format!(
            "exiftool failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let entries: Vec<ExiftoolEntry> = serde_json::from_slice(&output.stdout)
        .map_err(|e| DecodeError::Metadata(format!("bad exiftool JSON output: {e}")))?;
    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| DecodeError::Metadata("empty exiftool output".into()))?;

    let subsec = entry.subsec_time_original.as_ref().and_then(value_to_string);
    if let Some(dto) = entry.date_time_original.as_deref() {
        if let Some(dt) = parse_capture_time(dto, subsec.as_deref()) {
            return Ok(dt);
        }
        debug!(
            "unparseable DateTimeOriginal {:?} for {}, using mtime",
            dto,
            path.display()
        );
    }
    mtime_fallback(path)
}

fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse the EXIF `"YYYY:MM:DD HH:MM:SS"` format, attaching
/// `SubSecTimeOriginal` as fractional seconds when present. The sub-second
/// field holds decimal digits of the fraction, typically 2-3 of them.
fn parse_capture_time(date_time_original: &str, subsec: Option<&str>) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(date_time_original, "%Y:%m:%d %H:%M:%S").ok()?;

    let naive = match subsec {
        Some(s) if !s.is_empty() && s.len() <= 9 => match s.parse::<u32>() {
            Ok(fraction) => {
                let nanos = fraction * 10u32.pow(9 - s.len() as u32);
                naive.with_nanosecond(nanos).unwrap_or(naive)
            }
            Err(_) => naive,
        },
        _ => naive,
    };

    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn mtime_fallback(path: &Path) -> Result<DateTime<Utc>, DecodeError> {
    let metadata = std::fs::metadata(path)?;
    let modified = metadata.modified()?;
    Ok(DateTime::from(modified))
}
