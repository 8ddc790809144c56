use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{GameRecommendation, RecommendationRequest},
    services::recommendation,
};

use super::AppState;

const MAX_GAMES: usize = 5;
const MAX_WEEK: u32 = 18;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub username: String,
    #[serde(default = "default_games")]
    pub games: usize,
    #[serde(default)]
    pub only_starters: bool,
    #[serde(default)]
    pub include_opponents: bool,
    #[serde(default)]
    pub week: Option<u32>,
}

fn default_games() -> usize {
    1
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub week: u32,
    pub season: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Current NFL week and season, for pre-populating a week selector
pub async fn get_state(State(state): State<AppState>) -> AppResult<Json<StateResponse>> {
    let nfl_state = state.fantasy.league_state().await?;
    Ok(Json(StateResponse {
        week: nfl_state.week,
        season: nfl_state.season,
    }))
}

/// Ranked broadcast recommendations for a Sleeper username.
///
/// An unknown username is the only hard failure; everything downstream
/// degrades to an empty list.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<GameRecommendation>>> {
    let username = query.username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }
    if query.games < 1 || query.games > MAX_GAMES {
        return Err(AppError::InvalidInput(format!(
            "games must be between 1 and {}",
            MAX_GAMES
        )));
    }
    if let Some(week) = query.week {
        if week < 1 || week > MAX_WEEK {
            return Err(AppError::InvalidInput(format!(
                "week must be between 1 and {}",
                MAX_WEEK
            )));
        }
    }

    let user = state.fantasy.user_by_name(username).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user.user_id,
        games = query.games,
        only_starters = query.only_starters,
        include_opponents = query.include_opponents,
        "Processing recommendation request"
    );

    let request = RecommendationRequest {
        user_id: user.user_id,
        number_of_games: query.games,
        only_starters: query.only_starters,
        include_opponents: query.include_opponents,
        selected_week: query.week,
    };

    let recommendations = recommendation::recommend_games(
        state.fantasy.as_ref(),
        state.schedule.as_ref(),
        &request,
        Utc::now(),
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(recommendations))
}
