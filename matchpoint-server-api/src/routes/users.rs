use axum::{
    Json,
    extract::{Path, Query, State},
};
use matchpoint_server_domain::{
    app::AppState,
    users::{User, UserId, UserRole, UserUpdate},
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, jwt::AuthUser};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JsonUserRole {
    Player,
    Coach,
}

impl From<UserRole> for JsonUserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Player => JsonUserRole::Player,
            UserRole::Coach => JsonUserRole::Coach,
        }
    }
}

impl From<JsonUserRole> for UserRole {
    fn from(role: JsonUserRole) -> Self {
        match role {
            JsonUserRole::Player => UserRole::Player,
            JsonUserRole::Coach => UserRole::Coach,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct JsonUser {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
    pub role: JsonUserRole,
    pub wins: u32,
    pub losses: u32,
    pub matches_played: u32,
}

impl From<User> for JsonUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
            role: user.role.into(),
            wins: user.wins,
            losses: user.losses,
            matches_played: user.matches_played,
        }
    }
}

#[derive(Deserialize)]
pub struct BrowseQuery {
    role: Option<JsonUserRole>,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    name: Option<String>,
    avatar: Option<String>,
    role: Option<JsonUserRole>,
}

#[axum::debug_handler]
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Vec<JsonUser>>, ApiError> {
    let users = app_state
        .user_service
        .browse(query.role.map(Into::into))
        .await?;
    Ok(Json(users.into_iter().map(JsonUser::from).collect()))
}

#[axum::debug_handler]
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<JsonUser>, ApiError> {
    let user = app_state.user_service.fetch_user(id).await?;
    Ok(Json(user.into()))
}

#[axum::debug_handler]
pub async fn update_me(
    State(app_state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<JsonUser>, ApiError> {
    let update = UserUpdate {
        name: payload.name,
        avatar: payload.avatar,
        role: payload.role.map(Into::into),
    };
    let user = app_state.user_service.update_profile(user_id, update).await?;
    Ok(Json(user.into()))
}
