//! File size estimation and human-readable formatting.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Estimate the size of a stream from its bandwidth and duration.
///
/// `bandwidth` is in bits per second, `duration_ms` in milliseconds, as
/// reported by the playurl API (`timelength`). Returns `None` when either
/// value is missing upstream (reported as zero).
pub fn estimate_size(bandwidth: u64, duration_ms: u64) -> Option<String> {
    if bandwidth == 0 || duration_ms == 0 {
        return None;
    }
    let bytes = bandwidth as f64 * duration_ms as f64 / 8000.0;
    Some(format_size(bytes))
}

/// Format a byte count for humans.
///
/// Steps through B, KB, MB and GB by dividing by 1024, never going past GB,
/// and rounds to two decimal places.
pub fn format_size(bytes: f64) -> String {
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
