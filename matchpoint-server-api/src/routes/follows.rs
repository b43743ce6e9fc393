use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use matchpoint_server_domain::{app::AppState, follow::Follow, users::UserId};
use serde::Serialize;

use crate::{error::ApiError, jwt::AuthUser};

#[derive(Serialize, Clone)]
pub struct JsonFollow {
    pub follower: UserId,
    pub following: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<Follow> for JsonFollow {
    fn from(follow: Follow) -> Self {
        Self {
            follower: follow.follower,
            following: follow.following,
            created_at: follow.created_at,
        }
    }
}

#[axum::debug_handler]
pub async fn follow(
    State(app_state): State<AppState>,
    AuthUser(follower): AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<JsonFollow>, ApiError> {
    let follow = app_state.follow_service.follow(follower, id).await?;
    Ok(Json(follow.into()))
}

#[axum::debug_handler]
pub async fn unfollow(
    State(app_state): State<AppState>,
    AuthUser(follower): AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    app_state.follow_service.unfollow(follower, id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[axum::debug_handler]
pub async fn list_followers(
    State(app_state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<JsonFollow>>, ApiError> {
    let followers = app_state.follow_service.followers_of(id).await?;
    Ok(Json(followers.into_iter().map(JsonFollow::from).collect()))
}

#[axum::debug_handler]
pub async fn list_following(
    State(app_state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<JsonFollow>>, ApiError> {
    let following = app_state.follow_service.following_of(id).await?;
    Ok(Json(following.into_iter().map(JsonFollow::from).collect()))
}
