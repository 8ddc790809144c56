/// Upstream data source abstractions
///
/// The recommendation engine talks to two upstream services: the Sleeper
/// fantasy platform and ESPN's schedule API. Both are hidden behind traits
/// so the engine and scanner can be exercised against mocks.
///
/// Contract: every list operation returns an empty collection on upstream
/// failure and every single-entity lookup returns a sentinel absence, so
/// one flaky league never aborts a whole computation. The only exception
/// is `user_by_name`, whose failure is surfaced to the caller.
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{
    FantasyLeague, Game, Matchup, NflState, PlayerRecord, Roster, SleeperUser,
};

pub mod players;
pub mod recommendation;
pub mod scanner;
pub mod schedule;
pub mod sleeper;

/// Fantasy platform data source (Sleeper)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FantasySource: Send + Sync {
    /// Resolve a username to an account. The one hard-failing lookup:
    /// an unknown username is an error the caller sees.
    async fn user_by_name(&self, username: &str) -> AppResult<SleeperUser>;

    /// Look up an account by user id, for opponent display names.
    /// `None` on any failure.
    async fn user_by_id(&self, user_id: &str) -> Option<SleeperUser>;

    /// All leagues the user belongs to for a season. Empty on failure.
    async fn leagues_for_user(&self, user_id: &str, season: &str) -> Vec<FantasyLeague>;

    /// All rosters in a league. Empty on failure.
    async fn rosters_for_league(&self, league_id: &str) -> Vec<Roster>;

    /// A league's matchup entries for one week. Empty on failure.
    async fn matchups_for_week(&self, league_id: &str, week: u32) -> Vec<Matchup>;

    /// Sleeper's league-wide current week and season.
    async fn league_state(&self) -> AppResult<NflState>;

    /// The bulk player directory, served from the process-wide cache
    /// when fresh.
    async fn player_directory(&self) -> AppResult<Arc<HashMap<String, PlayerRecord>>>;
}

/// Real-world schedule data source (ESPN)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Normalized games for one regular-season week. Empty on failure.
    async fn games_for_week(&self, season: &str, week: u32) -> Vec<Game>;
}
