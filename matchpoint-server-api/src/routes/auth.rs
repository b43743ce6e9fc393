use axum::{Json, extract::State};
use matchpoint_server_domain::{app::AppState, auth::TelegramLogin};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, routes::users::JsonUser};

#[derive(Deserialize)]
pub struct TelegramLoginRequest {
    id: i64,
    first_name: String,
    last_name: Option<String>,
    username: Option<String>,
    photo_url: Option<String>,
    auth_date: i64,
    hash: String,
}

#[derive(Deserialize)]
pub struct DemoLoginRequest {
    name: String,
    password: String,
}

#[derive(Serialize)]
pub struct JsonAuthResponse {
    token: String,
    user: JsonUser,
}

#[axum::debug_handler]
pub async fn login_telegram(
    State(app_state): State<AppState>,
    Json(payload): Json<TelegramLoginRequest>,
) -> Result<Json<JsonAuthResponse>, ApiError> {
    let auth = app_state
        .auth_service
        .login_telegram(TelegramLogin {
            id: payload.id,
            first_name: payload.first_name,
            last_name: payload.last_name,
            username: payload.username,
            photo_url: payload.photo_url,
            auth_date: payload.auth_date,
            hash: payload.hash,
        })
        .await?;
    Ok(Json(JsonAuthResponse {
        token: auth.token,
        user: auth.user.into(),
    }))
}

#[axum::debug_handler]
pub async fn login_demo(
    State(app_state): State<AppState>,
    Json(payload): Json<DemoLoginRequest>,
) -> Result<Json<JsonAuthResponse>, ApiError> {
    let auth = app_state
        .auth_service
        .login_demo(&payload.name, &payload.password)
        .await?;
    Ok(Json(JsonAuthResponse {
        token: auth.token,
        user: auth.user.into(),
    }))
}
