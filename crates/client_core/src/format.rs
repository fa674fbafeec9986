//! Display helpers shared by every front end.

use chrono::{DateTime, Local, NaiveDateTime};
use shared::{
    domain::{MatchStatus, NotificationType},
    protocol::Match,
};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parses a backend timestamp into local wall-clock time. Accepts RFC 3339
/// and zone-less ISO date-times (taken as already local).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// `Mon, Jan 6, 2025, 02:30 PM`; unparseable input comes back unchanged.
pub fn format_event_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(at) => at.format("%a, %b %-d, %Y, %I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// Short form used on match cards: `Jan 6, 02:30 PM`.
pub fn format_match_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(at) => at.format("%b %-d, %I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// "Just now", "5m ago", "3h ago", or the calendar date past a day.
pub fn format_relative(raw: &str, now: NaiveDateTime) -> String {
    let Some(at) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        at.format("%-m/%-d/%Y").to_string()
    }
}

pub fn score_line(game: &Match) -> String {
    if game.status.shows_score() {
        format!(
            "{} - {}",
            game.home_score.unwrap_or(0),
            game.away_score.unwrap_or(0)
        )
    } else {
        "vs".to_string()
    }
}

pub fn match_status_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Scheduled => "Scheduled",
        MatchStatus::Live => "Live",
        MatchStatus::Completed => "Completed",
        MatchStatus::Cancelled => "Cancelled",
        MatchStatus::Postponed => "Postponed",
        MatchStatus::Unknown => "Unknown",
    }
}

pub fn event_status_label(status: &str) -> &'static str {
    match status.to_ascii_lowercase().as_str() {
        "live" => "Live",
        "completed" => "Completed",
        _ => "Scheduled",
    }
}

pub fn notification_type_label(kind: NotificationType) -> String {
    kind.as_wire().replace('_', " ")
}

pub fn notification_icon(kind: NotificationType) -> &'static str {
    match kind {
        NotificationType::MatchStarting => "🚀",
        NotificationType::ScoreUpdate => "📊",
        NotificationType::MatchResult => "🏆",
        NotificationType::TournamentUpdate => "📢",
        NotificationType::Unknown => "🎾",
    }
}

pub fn sport_icon(name: &str) -> &'static str {
    match name.to_lowercase().as_str() {
        "cricket" => "🏏",
        "football" => "⚽",
        "tennis" => "🎾",
        "badminton" => "🏸",
        _ => "🏆",
    }
}
