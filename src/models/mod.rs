use serde::{Deserialize, Serialize};

pub mod teams;

// ============================================================================
// Sleeper API Types
// ============================================================================

/// A Sleeper account, looked up by username or user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// One fantasy league a user belongs to for a given season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FantasyLeague {
    pub league_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl FantasyLeague {
    /// League name for display, falling back to the league id
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("League {}", self.league_id))
    }
}

/// A fantasy roster within one league
///
/// Sleeper serializes empty player lists as `null`, so both arrays are
/// optional on the wire and exposed through slice accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub roster_id: u64,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
    #[serde(default)]
    pub starters: Option<Vec<String>>,
}

impl Roster {
    pub fn player_ids(&self) -> &[String] {
        self.players.as_deref().unwrap_or_default()
    }

    pub fn is_starter(&self, player_id: &str) -> bool {
        self.starters
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|s| s == player_id)
    }
}

/// One roster's entry in a week's matchup list
///
/// Two rosters sharing a `matchup_id` oppose each other that week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    #[serde(default)]
    pub roster_id: u64,
    #[serde(default)]
    pub matchup_id: Option<u64>,
}

/// An entry in Sleeper's bulk player directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Sleeper's league-wide calendar state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NflState {
    pub week: u32,
    pub season: String,
    #[serde(default)]
    pub season_type: Option<String>,
    #[serde(default)]
    pub leg: Option<u32>,
}

// ============================================================================
// ESPN Schedule API Types
// ============================================================================

/// Week event listing; each item is a `$ref` URL to an event detail
#[derive(Debug, Deserialize)]
pub struct EspnEventList {
    #[serde(default)]
    pub items: Vec<EspnEventRef>,
}

#[derive(Debug, Deserialize)]
pub struct EspnEventRef {
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// Event detail record for one game
#[derive(Debug, Deserialize)]
pub struct EspnEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub competitions: Vec<EspnCompetition>,
}

#[derive(Debug, Deserialize)]
pub struct EspnCompetition {
    #[serde(default)]
    pub competitors: Vec<EspnCompetitor>,
    /// Loosely typed: ESPN sometimes inlines a status object, sometimes a $ref
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct EspnCompetitor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "homeAway")]
    pub home_away: Option<String>,
}

// ============================================================================
// Domain Types
// ============================================================================

/// A real-world NFL game, normalized from ESPN event data
///
/// Identity is (season, week, home, away). A kickoff of 0 means the
/// time is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub week: u32,
    pub season: String,
    pub away_team: String,
    pub home_team: String,
    /// Kickoff as epoch milliseconds; 0 when unknown
    pub kickoff: i64,
    pub status: String,
    pub name: String,
}

/// One fantasy player's contribution to a recommended game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerInfo {
    pub name: String,
    pub position: String,
    pub league: String,
    pub is_starter: bool,
    pub is_opponent: bool,
    pub owner_name: String,
}

/// A ranked broadcast recommendation returned to the client
#[derive(Debug, Clone, Serialize)]
pub struct GameRecommendation {
    pub game: Game,
    pub player_count: usize,
    pub players: Vec<PlayerInfo>,
}

/// Parameters for one recommendation computation
#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub user_id: String,
    pub number_of_games: usize,
    pub only_starters: bool,
    pub include_opponents: bool,
    pub selected_week: Option<u32>,
}
