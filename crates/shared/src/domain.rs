use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

macro_rules! key_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(SportId);
id_newtype!(TeamId);
id_newtype!(MatchId);

key_newtype!(TournamentId);
key_newtype!(EventId);
key_newtype!(NotificationId);
key_newtype!(UserKey);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Cancelled,
    Postponed,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Live => "LIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Postponed => "POSTPONED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Live and finished matches have a meaningful score.
    pub fn shows_score(self) -> bool {
        matches!(self, Self::Live | Self::Completed)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match status: {0}")]
pub struct ParseMatchStatusError(pub String);

impl std::str::FromStr for MatchStatus {
    type Err = ParseMatchStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(Self::Scheduled),
            "LIVE" => Ok(Self::Live),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "POSTPONED" => Ok(Self::Postponed),
            _ => Err(ParseMatchStatusError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    MatchStarting,
    ScoreUpdate,
    MatchResult,
    TournamentUpdate,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NotificationType {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::MatchStarting => "MATCH_STARTING",
            Self::ScoreUpdate => "SCORE_UPDATE",
            Self::MatchResult => "MATCH_RESULT",
            Self::TournamentUpdate => "TOURNAMENT_UPDATE",
            Self::Unknown => "UNKNOWN",
        }
    }
}
