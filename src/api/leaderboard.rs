use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::types::{LeaderboardEntry, TimeFrame};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub timeframe: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub timeframe: TimeFrame,
    pub min_games: u32,
    pub entries: Vec<LeaderboardEntry>,
}

/// Parse the `timeframe` query value, defaulting to 24H.
fn parse_timeframe(value: Option<&str>) -> Result<TimeFrame> {
    match value {
        None => Ok(TimeFrame::default()),
        Some(label) => TimeFrame::from_label(label)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown timeframe: {}", label))),
    }
}

async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<LeaderboardResponse>>> {
    let timeframe = parse_timeframe(query.timeframe.as_deref())?;
    let entries = state.game.leaderboard(timeframe).await?;

    Ok(Json(ApiResponse::new(LeaderboardResponse {
        timeframe,
        min_games: timeframe.min_games(),
        entries,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_leaderboard))
}
