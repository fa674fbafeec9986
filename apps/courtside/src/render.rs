//! Plain-text rendering of view data for the terminal.

use chrono::NaiveDateTime;
use client_core::{
    format::{
        event_status_label, format_event_time, format_match_time, format_relative,
        match_status_label, notification_icon, notification_type_label, score_line, sport_icon,
    },
    views::{sports::active_count, DashboardData, FavoritesData, NotificationFeed, NotifierOverview},
    ViewState,
};
use shared::protocol::{Match, Sport, Tournament, TournamentEvent};

pub fn match_line(game: &Match) -> String {
    let id = game.id.to_string();
    let mut line = format!(
        "#{id:<5} {} {} {}  [{}]",
        game.home_name(),
        score_line(game),
        game.away_name(),
        match_status_label(game.status)
    );
    if let Some(at) = &game.match_date_time {
        line.push_str(&format!("  {}", format_match_time(at)));
    }
    if let Some(venue) = &game.venue {
        line.push_str(&format!(" @ {venue}"));
    }
    line
}

pub fn match_list(matches: &[Match]) -> String {
    if matches.is_empty() {
        return "No matches.".to_string();
    }
    lines(matches.iter().map(match_line))
}

pub fn sport_line(sport: &Sport) -> String {
    let mut line = format!("{} {} (#{})", sport_icon(&sport.name), sport.name, sport.id);
    if !sport.active {
        line.push_str(" [inactive]");
    }
    line
}

pub fn sport_list(sports: &[Sport]) -> String {
    if sports.is_empty() {
        return "No sports.".to_string();
    }
    let mut out = format!("{} of {} active\n", active_count(sports), sports.len());
    out.push_str(&lines(sports.iter().map(sport_line)));
    out
}

pub fn sport_detail(sport: Option<&Sport>) -> String {
    let Some(sport) = sport else {
        return "Sport not found.".to_string();
    };
    match &sport.description {
        Some(description) => format!("{}\n{description}", sport_line(sport)),
        None => sport_line(sport),
    }
}

pub fn dashboard(data: &DashboardData) -> String {
    let stats = data.stats();
    let mut out = format!(
        "Live: {} | Upcoming: {} | Sports: {} | Tennis: {}\n",
        stats.live_matches, stats.upcoming_matches, stats.sports, stats.tennis_sports
    );
    out.push_str("\n== Live now ==\n");
    out.push_str(&match_list(data.live_preview()));
    out.push_str("\n\n== Upcoming ==\n");
    out.push_str(&match_list(&data.upcoming));
    out.push_str("\n\n== Sports ==\n");
    out.push_str(&sport_list(&data.sports));
    out
}

pub fn upcoming(matches: &[Match], sport_name: Option<&str>) -> String {
    let heading = match sport_name {
        Some(name) => format!("Upcoming {name} matches"),
        None => "Upcoming matches".to_string(),
    };
    format!("== {heading} ==\n{}", match_list(matches))
}

pub fn favorites(data: &FavoritesData) -> String {
    format!(
        "== Sports ==\n{}\n\n== Matches ==\n{}",
        sport_list(&data.sports),
        match_list(&data.matches)
    )
}

pub fn notification_feed(feed: &NotificationFeed, now: NaiveDateTime) -> String {
    let mut out = format!("{} unread\n", feed.unread_count);
    if feed.notifications.is_empty() {
        out.push_str("No notifications.");
        return out;
    }
    out.push_str(&lines(feed.notifications.iter().map(|notification| {
        let marker = if notification.read { " " } else { "*" };
        let when = notification
            .timestamp
            .as_deref()
            .map(|raw| format!(" ({})", format_relative(raw, now)))
            .unwrap_or_default();
        format!(
            "{marker} [{}] {} {}: {}: {}{when}",
            notification.id,
            notification_icon(notification.kind),
            notification_type_label(notification.kind),
            notification.title,
            notification.message
        )
    })));
    out
}

pub fn notifier(overview: &NotifierOverview) -> String {
    let health = &overview.health;
    let stats = &overview.stats;
    let mut out = format!(
        "Notifier: {} (scheduler {})\n",
        if health.is_healthy() { "healthy" } else { "unhealthy" },
        if health.scheduler_active { "active" } else { "stopped" }
    );
    out.push_str(&format!(
        "Sent: {} total, {} today | Scheduled matches: {} ({} notified)\n",
        stats.total_notifications_sent,
        stats.today_notifications,
        stats.total_scheduled_matches,
        stats.matches_with_notifications
    ));
    if overview.recent.is_empty() {
        out.push_str("No notifications sent yet.");
        return out;
    }
    out.push_str(&lines(overview.recent.iter().map(|sent| {
        let at = sent
            .sent_at
            .as_deref()
            .map(format_event_time)
            .unwrap_or_default();
        format!("{} vs {}  {at}", sent.home_player, sent.away_player)
    })));
    out
}

pub fn tournaments(list: &[Tournament]) -> String {
    if list.is_empty() {
        return "No tournaments.".to_string();
    }
    lines(list.iter().map(|tournament| {
        let mut line = format!("[{}] {}", tournament.tournament_id, tournament.name);
        if let Some(location) = &tournament.location {
            line.push_str(&format!(", {location}"));
        }
        line
    }))
}

pub fn events(tournament: Option<&Tournament>, events: &[TournamentEvent]) -> String {
    let heading = tournament.map_or("Events", |tournament| tournament.name.as_str());
    if events.is_empty() {
        return format!("== {heading} ==\nNo events.");
    }
    let body = lines(events.iter().map(|event| {
        let pairing = event
            .pairing()
            .map(|(first, second)| format!("{first} vs {second}"))
            .unwrap_or_else(|| event.participants.join(", "));
        let mut line = format!("{pairing}  [{}]", event_status_label(&event.status));
        if let Some(score) = &event.score {
            line.push_str(&format!("  {score}"));
        }
        if let Some(at) = &event.event_time {
            line.push_str(&format!("  {}", format_event_time(at)));
        }
        line
    }));
    format!("== {heading} ==\n{body}")
}

/// Footer shown under every refresh in watch mode.
pub fn status_footer<T>(state: &ViewState<T>) -> String {
    let mut footer = match state.last_updated {
        Some(at) => format!("-- updated {}", at.format("%H:%M:%S UTC")),
        None => "-- not loaded yet".to_string(),
    };
    if let Some(error) = &state.error {
        footer.push_str(&format!(" | {error}"));
    }
    footer
}

fn lines(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join("\n")
}
