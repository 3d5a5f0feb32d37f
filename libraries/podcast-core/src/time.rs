//! Time display helpers for the player bar

/// Format seconds as `MM:SS`
///
/// NaN and negative inputs render as `00:00`. Minutes are not wrapped into
/// hours, so a 90 minute episode shows `90:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Percentage of `duration` covered by `position`, for progress bar fills
///
/// Returns 0 while the duration is unknown.
pub fn progress_percent(position: f64, duration: f64) -> f64 {
    if duration > 0.0 && position.is_finite() {
        (position / duration * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
