//! Game durations travel as `HH:MM:SS` strings and are stored as seconds.

use crate::config::MAX_GAME_DURATION_SECS;

/// Parses `HH:MM:SS` into seconds. Minutes and seconds must be below 60.
/// Returns `None` for malformed, zero, or over-long durations.
pub fn parse_duration(input: &str) -> Option<i64> {
    let mut parts = input.trim().split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }

    let total = hours * 3600 + minutes * 60 + seconds;
    (total > 0 && total <= MAX_GAME_DURATION_SECS).then_some(total)
}

pub fn format_duration(secs: i64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
