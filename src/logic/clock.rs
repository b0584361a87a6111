//! Minute formatting for period labels and playtime.

/// Format fractional minutes as `m:ss`, rounded to the nearest second.
/// Negative values show as `0:00`.
pub fn format_minutes(minutes: f64) -> String {
    let total_seconds = if minutes.is_finite() && minutes > 0.0 {
        (minutes * 60.0).round() as u64
    } else {
        0
    };
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
