use chrono::{DateTime, NaiveDateTime};
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{teams, EspnEvent, EspnEventList, Game},
    services::ScheduleSource,
};

const REGULAR_SEASON_TYPE: u32 = 2;

/// Client for ESPN's core NFL schedule API
///
/// A week's event listing only carries `$ref` URLs; each game requires a
/// second fetch for teams and kickoff time. Those detail fetches are the
/// one concurrent fan-out in the system.
#[derive(Clone)]
pub struct EspnClient {
    http_client: HttpClient,
    api_url: String,
}

impl EspnClient {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "ESPN API returned status {} for {}",
                response.status(),
                url
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_event(&self, event_id: &str) -> AppResult<EspnEvent> {
        let url = format!(
            "{}/v2/sports/football/leagues/nfl/events/{}",
            self.api_url, event_id
        );
        self.get_json(&url).await
    }

    async fn fetch_week(&self, season: &str, week: u32) -> AppResult<Vec<Game>> {
        let events_url = format!(
            "{}/v2/sports/football/leagues/nfl/seasons/{}/types/{}/weeks/{}/events",
            self.api_url, season, REGULAR_SEASON_TYPE, week
        );

        let listing: EspnEventList = self.get_json(&events_url).await?;
        if listing.items.is_empty() {
            return Ok(Vec::new());
        }

        // Fetch event details concurrently and join before proceeding.
        let mut tasks = Vec::new();
        for item in &listing.items {
            let Some(event_id) = event_id_from_ref(&item.reference) else {
                continue;
            };
            let client = self.clone();
            tasks.push(tokio::spawn(
                async move { client.fetch_event(&event_id).await },
            ));
        }

        let mut games = Vec::new();
        let mut failures = 0usize;

        for task in tasks {
            match task.await {
                Ok(Ok(event)) => {
                    if let Some(game) = game_from_event(event, season, week) {
                        games.push(game);
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, week, "Event detail fetch failed");
                    failures += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, week, "Event detail task failed");
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                fetched = games.len(),
                failures,
                week,
                "Partial schedule fetch"
            );
        }

        Ok(games)
    }
}

/// Extracts the numeric event id from a `$ref` URL like
/// `.../leagues/nfl/events/401671717?lang=en`.
fn event_id_from_ref(reference: &str) -> Option<String> {
    let tail = reference.split("events/").nth(1)?;
    let id: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    (!id.is_empty()).then_some(id)
}

/// Parses ESPN's kickoff timestamps. The core API emits minute-precision
/// RFC3339 ("2025-11-09T18:00Z"); some endpoints include seconds. Returns
/// epoch milliseconds, 0 when absent or unparseable.
fn parse_kickoff(date: Option<&str>) -> i64 {
    let Some(date) = date else { return 0 };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return parsed.timestamp_millis();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%MZ") {
        return parsed.and_utc().timestamp_millis();
    }

    tracing::debug!(date, "Unparseable kickoff timestamp");
    0
}

fn game_from_event(event: EspnEvent, season: &str, week: u32) -> Option<Game> {
    let competition = event.competitions.first()?;

    let mut home_team = String::new();
    let mut away_team = String::new();

    // Unknown team ids map to an empty abbreviation, never an error.
    for competitor in &competition.competitors {
        let abbreviation = competitor
            .id
            .as_deref()
            .and_then(teams::espn_team_abbreviation)
            .unwrap_or("");

        match competitor.home_away.as_deref() {
            Some("home") => home_team = abbreviation.to_string(),
            Some("away") => away_team = abbreviation.to_string(),
            _ => {}
        }
    }

    let status = competition
        .status
        .as_ref()
        .and_then(|s| s.get("type"))
        .and_then(|t| t.as_str())
        .unwrap_or("scheduled")
        .to_string();

    let name = event
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("{} @ {}", away_team, home_team));

    Some(Game {
        week,
        season: season.to_string(),
        away_team,
        home_team,
        kickoff: parse_kickoff(event.date.as_deref()),
        status,
        name,
    })
}

#[async_trait::async_trait]
impl ScheduleSource for EspnClient {
    async fn games_for_week(&self, season: &str, week: u32) -> Vec<Game> {
        match self.fetch_week(season, week).await {
            Ok(games) => games,
            Err(e) => {
                tracing::warn!(error = %e, season, week, "Schedule fetch failed");
                Vec::new()
            }
        }
    }
}
