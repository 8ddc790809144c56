use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{
        FantasyLeague, Game, GameRecommendation, PlayerInfo, PlayerRecord,
        RecommendationRequest,
    },
    services::{players, scanner, FantasySource, ScheduleSource},
};

/// NFL regular season spans weeks 1-18; Sleeper reports out-of-season
/// weeks beyond that.
const MAX_REGULAR_SEASON_WEEK: u32 = 18;

/// Schedule weeks probed past the hint when looking for games in the
/// live window.
const SCHEDULE_PROBE_WEEKS: u32 = 5;

/// Kickoff window around "now" that marks a schedule week as current:
/// 7 days back (games already played this week) to 28 days forward
/// (mid-week schedule corrections, flexed games).
const KICKOFF_LOOKBACK_MS: i64 = 7 * 24 * 60 * 60 * 1000;
const KICKOFF_LOOKAHEAD_MS: i64 = 28 * 24 * 60 * 60 * 1000;

/// Per-request aggregation state.
///
/// `team_counts` holds the user's own players only; opponent players
/// live solely in `opponent_details` and contribute to display and
/// starter counts without ever entering the own-player identity space.
#[derive(Default)]
struct RosterTally {
    /// Player ids already counted across the user's own rosters
    counted: HashSet<String>,
    /// NFL team → number of the user's players on that team
    team_counts: HashMap<String, usize>,
    /// NFL team → detail for the user's players, in scan order
    own_details: HashMap<String, Vec<PlayerInfo>>,
    /// NFL team → detail for head-to-head opponents' players
    opponent_details: HashMap<String, Vec<PlayerInfo>>,
}

struct RankedGame {
    game: Game,
    display_count: usize,
    starter_count: usize,
    /// Involved teams with at least one of the user's players
    teams: Vec<String>,
}

/// Computes ranked broadcast recommendations for one user.
///
/// Leagues are scanned strictly in source order; every upstream hiccup
/// below user resolution degrades to an empty or partial result rather
/// than an error.
pub async fn recommend_games(
    fantasy: &dyn FantasySource,
    schedule: &dyn ScheduleSource,
    request: &RecommendationRequest,
    now: DateTime<Utc>,
) -> AppResult<Vec<GameRecommendation>> {
    let state = match fantasy.league_state().await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "League state unavailable");
            return Ok(Vec::new());
        }
    };

    let season = state.season.clone();
    let mut current_week = request.selected_week.unwrap_or(state.week);

    // Sleeper reports post-season and off-season as week 0 or >18.
    if current_week == 0 || current_week > MAX_REGULAR_SEASON_WEEK {
        tracing::debug!(reported = current_week, "Out-of-season week, using week 1");
        current_week = 1;
    }

    let leagues = fantasy
        .leagues_for_user(&request.user_id, &season)
        .await;

    tracing::info!(
        user_id = %request.user_id,
        season = %season,
        week = current_week,
        leagues = leagues.len(),
        "Starting recommendation scan"
    );

    if leagues.is_empty() {
        return Ok(Vec::new());
    }

    let directory = match fantasy.player_directory().await {
        Ok(directory) => directory,
        Err(e) => {
            tracing::warn!(error = %e, "Player directory unavailable");
            return Ok(Vec::new());
        }
    };

    let mut tally = RosterTally::default();
    for league in &leagues {
        scan_league(fantasy, league, request, current_week, &directory, &mut tally).await;
    }

    if tally.team_counts.is_empty() {
        return Ok(Vec::new());
    }

    let games = resolve_schedule_week(schedule, &season, current_week, now).await;
    if games.is_empty() {
        tracing::warn!(week = current_week, "No games found in the current timeframe");
        return Ok(Vec::new());
    }

    let ranked = rank_games(
        games,
        &tally,
        request.only_starters,
        request.include_opponents,
    );

    Ok(assemble(
        ranked,
        &tally,
        request.number_of_games,
        request.include_opponents,
    ))
}

/// Scans one league: resolves its active week, the user's roster, and
/// (optionally) the opponent's, folding players into the tally.
async fn scan_league(
    fantasy: &dyn FantasySource,
    league: &FantasyLeague,
    request: &RecommendationRequest,
    hint_week: u32,
    directory: &HashMap<String, PlayerRecord>,
    tally: &mut RosterTally,
) {
    let Some(active) = scanner::find_active_week(fantasy, &league.league_id, hint_week).await
    else {
        tracing::warn!(
            league_id = %league.league_id,
            "No valid matchups found, skipping league"
        );
        return;
    };

    let rosters = fantasy.rosters_for_league(&league.league_id).await;
    let Some(user_roster) = scanner::find_user_roster(&rosters, &request.user_id) else {
        tracing::warn!(league_id = %league.league_id, "No roster for user, skipping league");
        return;
    };

    if user_roster.player_ids().is_empty() {
        tracing::debug!(league_id = %league.league_id, "Empty roster, skipping league");
        return;
    }

    let league_name = league.display_name();

    for player_id in user_roster.player_ids() {
        // Each player counts once across all of the user's leagues.
        if !tally.counted.insert(player_id.clone()) {
            continue;
        }

        let resolved = players::resolve_player(player_id, directory);
        let Some(team) = resolved.team else {
            continue;
        };

        *tally.team_counts.entry(team.clone()).or_default() += 1;
        tally.own_details.entry(team).or_default().push(PlayerInfo {
            name: resolved.name,
            position: resolved.position,
            league: league_name.clone(),
            is_starter: user_roster.is_starter(player_id),
            is_opponent: false,
            owner_name: "You".to_string(),
        });
    }

    if !request.include_opponents {
        return;
    }

    let Some(opponent_roster_id) =
        scanner::find_opponent_roster_id(&active.matchups, user_roster.roster_id)
    else {
        return;
    };

    let Some(opponent) = rosters.iter().find(|r| r.roster_id == opponent_roster_id) else {
        return;
    };

    if opponent.player_ids().is_empty() {
        return;
    }

    let owner_name = opponent_owner_name(fantasy, opponent).await;

    for player_id in opponent.player_ids() {
        // Opponents dedup against already-counted own players only, and
        // never join the counted set themselves.
        if tally.counted.contains(player_id) {
            continue;
        }

        let resolved = players::resolve_player(player_id, directory);
        let Some(team) = resolved.team else {
            continue;
        };

        tally
            .opponent_details
            .entry(team)
            .or_default()
            .push(PlayerInfo {
                name: resolved.name,
                position: resolved.position,
                league: league_name.clone(),
                is_starter: opponent.is_starter(player_id),
                is_opponent: true,
                owner_name: owner_name.clone(),
            });
    }
}

async fn opponent_owner_name(fantasy: &dyn FantasySource, opponent: &crate::models::Roster) -> String {
    let Some(owner_id) = opponent.owner_id.as_deref() else {
        return "Opponent".to_string();
    };

    match fantasy.user_by_id(owner_id).await {
        Some(user) => user
            .username
            .filter(|n| !n.is_empty())
            .or(user.display_name.filter(|n| !n.is_empty()))
            .unwrap_or_else(|| format!("Owner {}", owner_id)),
        None => format!("Owner {}", owner_id),
    }
}

/// Finds the first schedule week at or after the hint whose games fall
/// inside the live kickoff window. Sleeper's week number can disagree
/// with the real calendar, so the hint is only a starting point.
async fn resolve_schedule_week(
    schedule: &dyn ScheduleSource,
    season: &str,
    hint_week: u32,
    now: DateTime<Utc>,
) -> Vec<Game> {
    let now_ms = now.timestamp_millis();
    let earliest = now_ms - KICKOFF_LOOKBACK_MS;
    let latest = now_ms + KICKOFF_LOOKAHEAD_MS;

    for offset in 0..SCHEDULE_PROBE_WEEKS {
        let week = hint_week + offset;
        let week_games = schedule.games_for_week(season, week).await;
        tracing::debug!(week, games = week_games.len(), "Fetched schedule week");

        let in_window: Vec<Game> = week_games
            .into_iter()
            .filter(|g| g.kickoff >= earliest && g.kickoff <= latest)
            .collect();

        if !in_window.is_empty() {
            tracing::debug!(week, games = in_window.len(), "Schedule week resolved");
            return in_window;
        }
    }

    Vec::new()
}

/// Scores and sorts games by the active filter's count. The sort is
/// stable; tied games keep their schedule order.
fn rank_games(
    games: Vec<Game>,
    tally: &RosterTally,
    only_starters: bool,
    include_opponents: bool,
) -> Vec<RankedGame> {
    let mut ranked = Vec::new();

    for game in games {
        let own_count = |team: &str| tally.team_counts.get(team).copied().unwrap_or(0);
        let own_total = own_count(&game.away_team) + own_count(&game.home_team);

        // A game qualifies only through the user's own players.
        if own_total == 0 {
            continue;
        }

        let mut teams = Vec::new();
        if own_count(&game.away_team) > 0 {
            teams.push(game.away_team.clone());
        }
        if own_count(&game.home_team) > 0 {
            teams.push(game.home_team.clone());
        }

        let mut display_count = own_total;
        if include_opponents {
            for team in &teams {
                display_count += tally.opponent_details.get(team).map_or(0, Vec::len);
            }
        }

        let mut starter_count = 0;
        if only_starters {
            for team in &teams {
                starter_count += tally
                    .own_details
                    .get(team)
                    .map_or(0, |p| p.iter().filter(|p| p.is_starter).count());

                if include_opponents {
                    starter_count += tally
                        .opponent_details
                        .get(team)
                        .map_or(0, |p| p.iter().filter(|p| p.is_starter).count());
                }
            }
        }

        ranked.push(RankedGame {
            game,
            display_count,
            starter_count,
            teams,
        });
    }

    if only_starters {
        ranked.sort_by(|a, b| b.starter_count.cmp(&a.starter_count));
    } else {
        ranked.sort_by(|a, b| b.display_count.cmp(&a.display_count));
    }

    ranked
}

/// Slices the ranked list and flattens per-team player detail into each
/// recommendation: own players first, then opponents, per team.
fn assemble(
    ranked: Vec<RankedGame>,
    tally: &RosterTally,
    number_of_games: usize,
    include_opponents: bool,
) -> Vec<GameRecommendation> {
    ranked
        .into_iter()
        .take(number_of_games)
        .map(|entry| {
            let mut players = Vec::new();
            for team in &entry.teams {
                if let Some(own) = tally.own_details.get(team) {
                    players.extend(own.iter().cloned());
                }
                if include_opponents {
                    if let Some(opponents) = tally.opponent_details.get(team) {
                        players.extend(opponents.iter().cloned());
                    }
                }
            }

            GameRecommendation {
                game: entry.game,
                player_count: entry.display_count,
                players,
            }
        })
        .collect()
}
