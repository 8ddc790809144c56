use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{FantasyLeague, Matchup, NflState, PlayerRecord, Roster, SleeperUser},
    services::{players::PlayerCache, FantasySource},
};

/// Client for the Sleeper fantasy platform API
///
/// All endpoints are unauthenticated JSON GETs. Sleeper returns a JSON
/// `null` body (with status 200) for unknown entities, so single-entity
/// lookups deserialize into `Option`.
pub struct SleeperClient {
    http_client: HttpClient,
    api_url: String,
    player_cache: PlayerCache,
}

impl SleeperClient {
    pub fn new(api_url: String, player_cache_ttl: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            player_cache: PlayerCache::new(player_cache_ttl),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Sleeper API returned status {} for {}",
                response.status(),
                url
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetches a list endpoint, substituting an empty vec on any failure
    /// or a null body.
    async fn get_list<T: DeserializeOwned>(&self, url: &str, context: &str) -> Vec<T> {
        match self.get_json::<Option<Vec<T>>>(url).await {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, context, "Sleeper list fetch failed");
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl FantasySource for SleeperClient {
    async fn user_by_name(&self, username: &str) -> AppResult<SleeperUser> {
        let url = format!("{}/user/{}", self.api_url, username);

        let user: Option<SleeperUser> = match self.get_json(&url).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, username, "User lookup failed");
                None
            }
        };

        user.ok_or_else(AppError::user_not_found)
    }

    async fn user_by_id(&self, user_id: &str) -> Option<SleeperUser> {
        let url = format!("{}/user/{}", self.api_url, user_id);

        match self.get_json::<Option<SleeperUser>>(&url).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, user_id, "User fetch failed");
                None
            }
        }
    }

    async fn leagues_for_user(&self, user_id: &str, season: &str) -> Vec<FantasyLeague> {
        let url = format!("{}/user/{}/leagues/nfl/{}", self.api_url, user_id, season);
        self.get_list(&url, "leagues").await
    }

    async fn rosters_for_league(&self, league_id: &str) -> Vec<Roster> {
        let url = format!("{}/league/{}/rosters", self.api_url, league_id);
        self.get_list(&url, "rosters").await
    }

    async fn matchups_for_week(&self, league_id: &str, week: u32) -> Vec<Matchup> {
        let url = format!("{}/league/{}/matchups/{}", self.api_url, league_id, week);
        self.get_list(&url, "matchups").await
    }

    async fn league_state(&self) -> AppResult<NflState> {
        let url = format!("{}/state/nfl", self.api_url);
        self.get_json(&url).await
    }

    async fn player_directory(&self) -> AppResult<Arc<HashMap<String, PlayerRecord>>> {
        if let Some(players) = self.player_cache.get(Instant::now()).await {
            tracing::debug!("Player directory cache hit");
            return Ok(players);
        }

        // Cold or stale: full refresh before returning. The directory is
        // one large payload covering every NFL player.
        let url = format!("{}/players/nfl", self.api_url);
        let directory: HashMap<String, PlayerRecord> = self.get_json(&url).await?;

        tracing::info!(players = directory.len(), "Player directory refreshed");

        let players = Arc::new(directory);
        self.player_cache.store(players.clone(), Instant::now()).await;

        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> SleeperClient {
        SleeperClient::new(server.url(), Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_user_by_name_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/testuser")
            .with_status(200)
            .with_body(r#"{"user_id": "12345", "username": "testuser", "display_name": "Test User"}"#)
            .create_async()
            .await;

        let user = client_for(&server).user_by_name("testuser").await.unwrap();
        assert_eq!(user.user_id, "12345");
        assert_eq!(user.username.as_deref(), Some("testuser"));
    }

    #[tokio::test]
    async fn test_user_by_name_null_body_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/ghost")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let result = client_for(&server).user_by_name("ghost").await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_user_by_name_upstream_error_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/flaky")
            .with_status(500)
            .create_async()
            .await;

        let result = client_for(&server).user_by_name("flaky").await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_matchups_fetch() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/league/league1/matchups/3")
            .with_status(200)
            .with_body(r#"[{"roster_id": 1, "matchup_id": 2}, {"roster_id": 4, "matchup_id": 2}]"#)
            .create_async()
            .await;

        let matchups = client_for(&server)
            .matchups_for_week("league1", 3)
            .await;
        assert_eq!(matchups.len(), 2);
        assert_eq!(matchups[0].roster_id, 1);
        assert_eq!(matchups[0].matchup_id, Some(2));
    }

    #[tokio::test]
    async fn test_matchups_failure_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/league/league1/matchups/3")
            .with_status(503)
            .create_async()
            .await;

        let matchups = client_for(&server)
            .matchups_for_week("league1", 3)
            .await;
        assert!(matchups.is_empty());
    }

    #[tokio::test]
    async fn test_leagues_null_body_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/u1/leagues/nfl/2025")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let leagues = client_for(&server).leagues_for_user("u1", "2025").await;
        assert!(leagues.is_empty());
    }

    #[tokio::test]
    async fn test_player_directory_is_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/players/nfl")
            .with_status(200)
            .with_body(r#"{"4034": {"first_name": "Patrick", "last_name": "Mahomes", "position": "QB", "team": "KC"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);

        let first = client.player_directory().await.unwrap();
        let second = client.player_directory().await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_league_state_fetch() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/state/nfl")
            .with_status(200)
            .with_body(r#"{"week": 11, "season": "2025", "season_type": "regular", "leg": 11}"#)
            .create_async()
            .await;

        let state = client_for(&server).league_state().await.unwrap();
        assert_eq!(state.week, 11);
        assert_eq!(state.season, "2025");
    }
}
