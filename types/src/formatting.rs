//! Centralized display formatting for timers.
//!
//! Widgets, the dashboard and notification bodies all render remaining
//! time through this module so a timer reads the same everywhere.

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Format remaining upgrade time the way builder rows show it.
///
/// - Values <= 0: `Complete`
/// - At least one day: `Xd Yh`
/// - At least one hour: `Xh Ym`
/// - Otherwise: `Xm`
///
/// Fractional seconds are truncated.
///
/// # Examples
/// ```
/// use clashdash_types::formatting::format_time_remaining;
/// assert_eq!(format_time_remaining(0.0), "Complete");
/// assert_eq!(format_time_remaining(90_061.0), "1d 1h");
/// assert_eq!(format_time_remaining(3_725.0), "1h 2m");
/// assert_eq!(format_time_remaining(125.0), "2m");
/// ```
pub fn format_time_remaining(secs: f64) -> String {
    if secs <= 0.0 {
        return "Complete".to_string();
    }
    let total = secs as i64;
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a refresh cooldown as `Mm SSs`, or `Ss` under a minute.
///
/// # Examples
/// ```
/// use clashdash_types::formatting::format_cooldown;
/// assert_eq!(format_cooldown(125.4), "2m 05s");
/// assert_eq!(format_cooldown(42.0), "42s");
/// assert_eq!(format_cooldown(-3.0), "0s");
/// ```
pub fn format_cooldown(secs: f64) -> String {
    let total = (secs.round() as i64).max(0);
    let minutes = total / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;
    if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Format a duration as `H:MM:SS` for the countdown column.
///
/// # Examples
/// ```
/// use clashdash_types::formatting::format_clock;
/// assert_eq!(format_clock(3_725), "1:02:05");
/// assert_eq!(format_clock(59), "0:00:59");
/// assert_eq!(format_clock(-10), "0:00:00");
/// ```
pub fn format_clock(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / SECS_PER_HOUR;
    let minutes = (secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = secs % SECS_PER_MINUTE;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a `[0, 1]` fraction as a percentage with 1 decimal place.
///
/// # Examples
/// ```
/// use clashdash_types::formatting::format_progress;
/// assert_eq!(format_progress(0.427), "42.7%");
/// assert_eq!(format_progress(1.0), "100.0%");
/// ```
pub fn format_progress(fraction: f64) -> String {
    format!("{:.1}%", fraction.clamp(0.0, 1.0) * 100.0)
}
