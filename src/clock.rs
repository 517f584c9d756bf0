//! Playback position and time label mapping
//!
//! Converts seek-bar fractions to playback positions and playback positions
//! to the "MM:SS" labels the host displays next to the seek bar.

/// Format a playback position or duration as "MM:SS".
///
/// Anything below one second (including zero, negatives and NaN) is
/// normalized to the `"00:00"` sentinel so the display never shows a NaN.
/// Minutes and seconds both truncate toward zero; minutes are not wrapped
/// at the hour, so a full hour reads "60:00".
pub fn format_time(seconds: f64) -> String {
    if !(seconds >= 1.0) {
        return "00:00".to_string();
    }
    let whole = seconds as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Map the current playback position to a seek-bar fraction in [0, 1].
///
/// Returns 0.0 when the duration is unknown, zero or non-finite.
pub fn seek_fraction(current: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    (current / duration).clamp(0.0, 1.0)
}
