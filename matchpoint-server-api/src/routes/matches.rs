use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use matchpoint_core::{RawSetScore, SetScore};
use matchpoint_server_domain::{
    ServiceError,
    app::AppState,
    matches::{Match, MatchId, MatchType, MatchUpdate, NewMatch},
    users::UserId,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, jwt::AuthUser};

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum JsonMatchType {
    Casual,
    Tournament,
    Rated,
}

impl From<MatchType> for JsonMatchType {
    fn from(match_type: MatchType) -> Self {
        match match_type {
            MatchType::Casual => JsonMatchType::Casual,
            MatchType::Tournament => JsonMatchType::Tournament,
            MatchType::Rated => JsonMatchType::Rated,
        }
    }
}

impl From<JsonMatchType> for MatchType {
    fn from(match_type: JsonMatchType) -> Self {
        match match_type {
            JsonMatchType::Casual => MatchType::Casual,
            JsonMatchType::Tournament => MatchType::Tournament,
            JsonMatchType::Rated => MatchType::Rated,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct JsonMatch {
    pub id: MatchId,
    pub player1: UserId,
    pub player2: UserId,
    pub date: DateTime<Utc>,
    pub sets: Vec<SetScore>,
    pub winner: Option<UserId>,
    pub match_type: JsonMatchType,
    pub tournament: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Match> for JsonMatch {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            player1: m.player1,
            player2: m.player2,
            date: m.date,
            winner: m.winner(),
            sets: m.sets,
            match_type: m.match_type.into(),
            tournament: m.tournament,
            notes: m.notes,
            created_at: m.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateMatchRequest {
    player1: UserId,
    player2: UserId,
    date: DateTime<Utc>,
    sets: Vec<RawSetScore>,
    match_type: JsonMatchType,
    tournament: Option<String>,
    notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateMatchRequest {
    sets: Option<Vec<RawSetScore>>,
    notes: Option<String>,
    tournament: Option<String>,
}

#[axum::debug_handler]
pub async fn create_match(
    State(app_state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<CreateMatchRequest>,
) -> Result<Json<JsonMatch>, ApiError> {
    let created = app_state
        .match_service
        .record_match(NewMatch {
            player1: payload.player1,
            player2: payload.player2,
            date: payload.date,
            sets: payload.sets,
            match_type: payload.match_type.into(),
            tournament: payload.tournament,
            notes: payload.notes,
        })
        .await?;
    Ok(Json(created.into()))
}

#[axum::debug_handler]
pub async fn get_match(
    State(app_state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<JsonMatch>, ApiError> {
    let m = app_state.match_service.get_match(id).await?;
    Ok(Json(m.into()))
}

#[axum::debug_handler]
pub async fn list_matches_for_user(
    State(app_state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<JsonMatch>>, ApiError> {
    let matches = app_state.match_service.matches_for_user(id).await?;
    Ok(Json(matches.into_iter().map(JsonMatch::from).collect()))
}

#[axum::debug_handler]
pub async fn update_match(
    State(app_state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<MatchId>,
    Json(payload): Json<UpdateMatchRequest>,
) -> Result<Json<JsonMatch>, ApiError> {
    let sets = match payload.sets {
        Some(raw) => Some(normalize_sets(&raw)?),
        None => None,
    };
    let updated = app_state
        .match_service
        .update_match(
            id,
            MatchUpdate {
                sets,
                notes: payload.notes,
                tournament: payload.tournament,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

fn normalize_sets(raw: &[RawSetScore]) -> Result<Vec<SetScore>, ApiError> {
    raw.iter()
        .map(|r| {
            r.normalize()
                .map_err(|e| ApiError::from(ServiceError::Validation(e.to_string())))
        })
        .collect()
}
