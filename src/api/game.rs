use super::ApiResponse;
use crate::error::Result;
use crate::types::{
    GameRecord, GameSnapshot, PlayerStats, Prediction, ShareCard, StartOutcome, StatsSummary,
};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StartRoundRequest {
    pub prediction: Prediction,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: PlayerStats,
    pub summary: StatsSummary,
}

/// Current price, round phase and player aggregate.
async fn get_state(State(state): State<AppState>) -> Result<Json<ApiResponse<GameSnapshot>>> {
    let snapshot = state.game.snapshot().await?;
    Ok(Json(ApiResponse::new(snapshot)))
}

/// Start a round. Refusals (round in progress, feed not ready) are reported in
/// the outcome, not as errors.
async fn start_round(
    State(state): State<AppState>,
    Json(request): Json<StartRoundRequest>,
) -> Result<Json<ApiResponse<StartOutcome>>> {
    let outcome = state.game.start_round(request.prediction).await?;
    Ok(Json(ApiResponse::new(outcome)))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<StatsResponse>>> {
    let snapshot = state.game.snapshot().await?;
    Ok(Json(ApiResponse::new(StatsResponse {
        stats: snapshot.stats,
        summary: snapshot.summary,
    })))
}

async fn get_history(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<GameRecord>>>> {
    let history = state.game.history().await?;
    Ok(Json(ApiResponse::new(history)))
}

async fn get_share(State(state): State<AppState>) -> Result<Json<ApiResponse<ShareCard>>> {
    let card = state.game.share_card().await?;
    Ok(Json(ApiResponse::new(card)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/round", post(start_round))
        .route("/api/stats", get(get_stats))
        .route("/api/history", get(get_history))
        .route("/api/share", get(get_share))
}
