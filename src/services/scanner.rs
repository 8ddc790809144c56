use std::collections::HashSet;

use crate::models::{Matchup, Roster};
use crate::services::FantasySource;

/// How many weeks past the hint to probe before giving up on a league.
/// Leagues can lag or lead Sleeper's league-wide calendar.
const WEEK_PROBE_LIMIT: u32 = 5;

/// A league's resolved matchup week
#[derive(Debug, Clone)]
pub struct ActiveWeek {
    pub week: u32,
    pub matchups: Vec<Matchup>,
}

/// Finds the league's active matchup week, probing `hint..=hint+5`.
///
/// A week is valid when its matchup list is non-empty and carries at
/// least one distinct roster id (guards against byes and bad data). The
/// first valid week wins; `None` means the league is skipped for this
/// run.
pub async fn find_active_week(
    fantasy: &dyn FantasySource,
    league_id: &str,
    hint_week: u32,
) -> Option<ActiveWeek> {
    for week in hint_week..=hint_week + WEEK_PROBE_LIMIT {
        let matchups = fantasy.matchups_for_week(league_id, week).await;
        if matchups.is_empty() {
            continue;
        }

        let roster_ids: HashSet<u64> = matchups
            .iter()
            .map(|m| m.roster_id)
            .filter(|id| *id != 0)
            .collect();

        if !roster_ids.is_empty() {
            tracing::debug!(league_id, week, "Found valid matchup week");
            return Some(ActiveWeek { week, matchups });
        }
    }

    None
}

/// The user's roster in a league, matched by owner id.
pub fn find_user_roster<'a>(rosters: &'a [Roster], user_id: &str) -> Option<&'a Roster> {
    rosters.iter().find(|r| r.owner_id.as_deref() == Some(user_id))
}

/// Resolves the head-to-head opponent's roster id for a week.
///
/// Exactly one other roster sharing the user's matchup id defines a
/// valid 1v1 opponent. Zero means no opponent this week (bye or
/// best-ball); more than one means a non-standard format. Both cases
/// yield `None` and never affect own-player counting.
pub fn find_opponent_roster_id(matchups: &[Matchup], user_roster_id: u64) -> Option<u64> {
    let user_matchup = matchups.iter().find(|m| m.roster_id == user_roster_id)?;
    let matchup_id = user_matchup.matchup_id?;

    let opponents: Vec<u64> = matchups
        .iter()
        .filter(|m| m.roster_id != user_roster_id && m.matchup_id == Some(matchup_id))
        .map(|m| m.roster_id)
        .collect();

    match opponents.as_slice() {
        [opponent] => Some(*opponent),
        [] => {
            tracing::debug!(user_roster_id, "No opponent this week (bye or best ball)");
            None
        }
        _ => {
            tracing::warn!(
                user_roster_id,
                opponents = opponents.len(),
                "Multiple rosters share the matchup, not a 1v1 league; skipping opponent"
            );
            None
        }
    }
}
