use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// English football league tier covered by the prediction game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum League {
    /// EFL Championship (second tier).
    Championship,
    /// EFL League One (third tier).
    LeagueOne,
    /// EFL League Two (fourth tier).
    LeagueTwo,
}

impl League {
    /// Every league offered by the game, in display order.
    pub const ALL: [League; 3] = [League::Championship, League::LeagueOne, League::LeagueTwo];

    /// Snake-case name used in remote table rows and URL paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            League::Championship => "championship",
            League::LeagueOne => "league_one",
            League::LeagueTwo => "league_two",
        }
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for League {
    type Err = UnknownLeague;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "championship" => Ok(League::Championship),
            "league_one" => Ok(League::LeagueOne),
            "league_two" => Ok(League::LeagueTwo),
            other => Err(UnknownLeague(other.to_string())),
        }
    }
}

/// Error raised when parsing a league name that is not part of the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown league `{0}`")]
pub struct UnknownLeague(pub String);

/// Token pair identifying an authenticated user to the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionEntity {
    /// Bearer token applied to every authenticated remote request.
    pub access_token: String,
    /// Token exchanged for a fresh access token when the session is restored.
    pub refresh_token: String,
    /// Identifier of the account this session belongs to.
    pub user_id: Uuid,
    /// Moment the access token expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Live user record sourced from the remote auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Stable account identifier.
    pub id: Uuid,
    /// Email address the account was registered with.
    pub email: String,
    /// Optional display name kept in the account metadata.
    pub display_name: Option<String>,
}

/// Representation of a team row in the remote `teams` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Club name as displayed in the table.
    pub name: String,
    /// League the team competes in this season.
    pub league: League,
    /// Season the row applies to, e.g. `2025/2026`.
    pub season: String,
    /// Default position used before any prediction exists.
    pub sort_order: i32,
}

/// A user's predicted finishing order for one league and season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionEntity {
    /// Account the prediction belongs to.
    pub user_id: Uuid,
    /// League the prediction covers.
    pub league: League,
    /// Season the prediction covers.
    pub season: String,
    /// Team identifiers in predicted finishing order, first to last.
    pub rankings: Vec<Uuid>,
    /// Moment the prediction was last saved.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
