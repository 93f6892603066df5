//! Display helpers for times, dates and leaderboard ranks.

use chrono::{DateTime, Local, Utc};

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a date as `dd/mm/yyyy` in the local time zone.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%d/%m/%Y").to_string()
}

/// Medal for a 0-based leaderboard rank.
pub fn medal(rank: usize) -> &'static str {
    match rank {
        0 => "🥇",
        1 => "🥈",
        2 => "🥉",
        _ => "🏅",
    }
}
