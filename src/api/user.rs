use super::ApiResponse;
use crate::error::Result;
use crate::types::User;
use crate::AppState;
use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub handle: String,
}

/// Claim a handle. An input that is empty after cleaning changes nothing and
/// returns `null`.
async fn claim(
    State(state): State<AppState>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<ApiResponse<Option<User>>>> {
    let user = state.game.claim_identity(request.handle).await?;
    Ok(Json(ApiResponse::new(user)))
}

/// Log out; returns the user that was signed in, if any.
async fn logout(State(state): State<AppState>) -> Result<Json<ApiResponse<Option<User>>>> {
    let previous = state.game.logout().await?;
    Ok(Json(ApiResponse::new(previous)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(claim).delete(logout))
}
