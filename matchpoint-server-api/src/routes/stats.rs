use axum::{
    Json,
    extract::{Path, Query, State},
};
use matchpoint_core::stats::{OpponentCount, Streak, StreakKind};
use matchpoint_server_domain::{app::AppState, stats::UserStats, users::UserId};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

const DEFAULT_TOP_OPPONENTS: usize = 5;

#[derive(Serialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum JsonStreakKind {
    Win,
    Loss,
}

#[derive(Serialize, Clone, Copy)]
pub struct JsonStreak {
    pub length: u32,
    pub kind: JsonStreakKind,
}

impl From<Streak> for JsonStreak {
    fn from(streak: Streak) -> Self {
        Self {
            length: streak.length,
            kind: match streak.kind {
                StreakKind::Win => JsonStreakKind::Win,
                StreakKind::Loss => JsonStreakKind::Loss,
            },
        }
    }
}

#[derive(Serialize, Clone)]
pub struct JsonUserStats {
    pub win_rate: u32,
    pub total_matches: u32,
    pub set_win_rate: u32,
    pub current_streak: JsonStreak,
    pub longest_win_streak: u32,
}

impl From<UserStats> for JsonUserStats {
    fn from(stats: UserStats) -> Self {
        Self {
            win_rate: stats.win_rate,
            total_matches: stats.total_matches,
            set_win_rate: stats.set_win_rate,
            current_streak: stats.current_streak.into(),
            longest_win_streak: stats.longest_win_streak,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct JsonOpponentCount {
    pub opponent_id: UserId,
    pub count: u32,
}

impl From<OpponentCount> for JsonOpponentCount {
    fn from(entry: OpponentCount) -> Self {
        Self {
            opponent_id: entry.opponent,
            count: entry.count,
        }
    }
}

#[derive(Deserialize)]
pub struct TopQuery {
    top: Option<usize>,
}

#[axum::debug_handler]
pub async fn get_user_stats(
    State(app_state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<JsonUserStats>, ApiError> {
    let stats = app_state.stats_service.user_stats(id).await?;
    Ok(Json(stats.into()))
}

#[axum::debug_handler]
pub async fn get_frequent_opponents(
    State(app_state): State<AppState>,
    Path(id): Path<UserId>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<JsonOpponentCount>>, ApiError> {
    let top_n = query.top.unwrap_or(DEFAULT_TOP_OPPONENTS);
    let opponents = app_state.stats_service.frequent_opponents(id, top_n).await?;
    Ok(Json(
        opponents.into_iter().map(JsonOpponentCount::from).collect(),
    ))
}
