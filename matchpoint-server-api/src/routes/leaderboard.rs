use axum::{Json, extract::State};
use matchpoint_server_domain::{app::AppState, ranking::LeaderboardEntry, users::UserId};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Serialize, Clone)]
pub struct JsonLeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub name: String,
    pub avatar: Option<String>,
    pub rating: i32,
}

impl From<LeaderboardEntry> for JsonLeaderboardEntry {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            user_id: entry.user_id,
            name: entry.name,
            avatar: entry.avatar,
            rating: entry.rating,
        }
    }
}

#[axum::debug_handler]
pub async fn get_leaderboard(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<JsonLeaderboardEntry>>, ApiError> {
    let entries = app_state.leaderboard_service.leaderboard().await?;
    Ok(Json(
        entries.into_iter().map(JsonLeaderboardEntry::from).collect(),
    ))
}
