//! JSON shapes exchanged with the sports tracker REST API.
//!
//! Every response type deserializes tolerantly: missing or `null` fields fall
//! back to their defaults and unknown fields are ignored. Timestamps stay as the raw
//! strings the backend sent; `client_core::format` parses them for display.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{
    EventId, MatchId, MatchStatus, NotificationId, NotificationType, SportId, TeamId, TournamentId,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sport {
    #[serde(deserialize_with = "null_as_default")]
    pub id: SportId,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub active: bool,
}

impl Sport {
    pub fn is_tennis(&self) -> bool {
        self.name.to_lowercase().contains("tennis")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Team {
    #[serde(deserialize_with = "null_as_default")]
    pub id: TeamId,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Match {
    #[serde(deserialize_with = "null_as_default")]
    pub id: MatchId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<Sport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i32>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_stream_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_summary: Option<String>,
}

impl Match {
    pub fn home_name(&self) -> &str {
        self.home_team.as_ref().map_or("TBD", |team| team.name.as_str())
    }

    pub fn away_name(&self) -> &str {
        self.away_team.as_ref().map_or("TBD", |team| team.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub home_score: i32,
    pub away_score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: MatchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tournament {
    #[serde(deserialize_with = "null_as_default")]
    pub tournament_id: TournamentId,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub event_id: EventId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub participants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
}

impl TournamentEvent {
    /// The two sides of the event, when the backend reported at least two.
    pub fn pairing(&self) -> Option<(&str, &str)> {
        match self.participants.as_slice() {
            [first, second, ..] => Some((first.as_str(), second.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TennisNotification {
    #[serde(deserialize_with = "null_as_default")]
    pub id: NotificationId,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: NotificationType,
    #[serde(deserialize_with = "null_as_default")]
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnreadCount {
    #[serde(deserialize_with = "null_as_default")]
    pub unread_count: u32,
}

/// A notification already pushed by the backend's match notifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentNotification {
    #[serde(deserialize_with = "null_as_default")]
    pub home_player: String,
    #[serde(deserialize_with = "null_as_default")]
    pub away_player: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_notifications_sent: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub today_notifications: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_scheduled_matches: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub matches_with_notifications: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifierHealth {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub scheduler_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check: Option<String>,
}

impl NotifierHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_decodes_backend_shape_and_tolerates_unknown_status() {
        let raw = r#"{
            "id": 4,
            "homeTeam": {"id": 1, "name": "Sinner", "active": true},
            "awayTeam": {"id": 2, "name": "Alcaraz", "active": true},
            "sport": {"id": 3, "name": "Tennis", "active": true},
            "matchDateTime": "2025-07-13T14:00:00",
            "homeScore": 2,
            "status": "SUSPENDED",
            "somethingNew": [1, 2, 3]
        }"#;

        let decoded: Match = serde_json::from_str(raw).expect("decode match");
        assert_eq!(decoded.id, MatchId(4));
        assert_eq!(decoded.home_name(), "Sinner");
        assert_eq!(decoded.away_score, None);
        assert_eq!(decoded.status, MatchStatus::Unknown);
        assert_eq!(decoded.match_date_time.as_deref(), Some("2025-07-13T14:00:00"));
    }

    #[test]
    fn notification_maps_type_field() {
        let raw = r#"{"id":"n1","title":"t","message":"m","type":"SCORE_UPDATE","read":false}"#;
        let decoded: TennisNotification = serde_json::from_str(raw).expect("decode notification");
        assert_eq!(decoded.kind, NotificationType::ScoreUpdate);
        assert_eq!(decoded.id.as_str(), "n1");
        assert!(!decoded.read);
    }

    #[test]
    fn score_update_serializes_camel_case() {
        let body = serde_json::to_value(ScoreUpdate {
            home_score: 6,
            away_score: 4,
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({"homeScore": 6, "awayScore": 4}));
    }

    #[test]
    fn sent_notification_keeps_unmodelled_fields() {
        let raw = r#"{"homePlayer":"Swiatek","awayPlayer":"Gauff","tournament":"Roland Garros"}"#;
        let decoded: SentNotification = serde_json::from_str(raw).expect("decode");
        assert_eq!(decoded.home_player, "Swiatek");
        assert_eq!(
            decoded.details.get("tournament"),
            Some(&serde_json::json!("Roland Garros"))
        );
    }

    #[test]
    fn event_pairing_requires_two_participants() {
        let mut event = TournamentEvent {
            participants: vec!["Zverev".into()],
            ..TournamentEvent::default()
        };
        assert_eq!(event.pairing(), None);
        event.participants.push("Ruud".into());
        assert_eq!(event.pairing(), Some(("Zverev", "Ruud")));
    }

    #[test]
    fn explicit_nulls_decode_as_defaults() {
        let stats: NotificationStats = serde_json::from_str(
            r#"{"totalNotificationsSent":null,"todayNotifications":3,"totalScheduledMatches":null,"matchesWithNotifications":null}"#,
        )
        .expect("decode stats");
        assert_eq!(stats.total_notifications_sent, 0);
        assert_eq!(stats.today_notifications, 3);

        let sent: SentNotification =
            serde_json::from_str(r#"{"homePlayer":"Swiatek","awayPlayer":null}"#).expect("decode sent");
        assert_eq!(sent.home_player, "Swiatek");
        assert_eq!(sent.away_player, "");
        assert!(sent.details.is_empty());

        let tournament: Tournament =
            serde_json::from_str(r#"{"tournamentId":"wimbledon","name":null}"#).expect("decode tournament");
        assert_eq!(tournament.tournament_id.as_str(), "wimbledon");
        assert_eq!(tournament.name, "");

        let game: Match =
            serde_json::from_str(r#"{"id":9,"status":null,"homeTeam":{"id":null,"name":null,"active":null}}"#)
                .expect("decode match");
        assert_eq!(game.status, MatchStatus::Scheduled);
        assert_eq!(game.home_name(), "");

        let notification: TennisNotification =
            serde_json::from_str(r#"{"id":"n2","title":null,"type":null,"read":null}"#)
                .expect("decode notification");
        assert_eq!(notification.kind, NotificationType::Unknown);
        assert!(!notification.read);

        let event: TournamentEvent =
            serde_json::from_str(r#"{"eventId":"e1","participants":null,"status":null}"#).expect("decode event");
        assert!(event.participants.is_empty());
        assert_eq!(event.pairing(), None);
    }
}
