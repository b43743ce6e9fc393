use axum::{
    Router,
    routing::{get, patch, post},
};
use matchpoint_server_domain::app::AppState;
use tower_http::cors::CorsLayer;

pub mod auth;
pub mod follows;
pub mod leaderboard;
pub mod matches;
pub mod stats;
pub mod users;

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/auth/telegram", post(auth::login_telegram))
        .route("/api/auth/demo", post(auth::login_demo))
        .route("/api/users", get(users::list_users))
        .route("/api/users/me", patch(users::update_me))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/users/{id}/matches", get(matches::list_matches_for_user))
        .route("/api/users/{id}/stats", get(stats::get_user_stats))
        .route("/api/users/{id}/opponents", get(stats::get_frequent_opponents))
        .route(
            "/api/users/{id}/follow",
            post(follows::follow).delete(follows::unfollow),
        )
        .route("/api/users/{id}/followers", get(follows::list_followers))
        .route("/api/users/{id}/following", get(follows::list_following))
        .route("/api/matches", post(matches::create_match))
        .route(
            "/api/matches/{id}",
            get(matches::get_match).patch(matches::update_match),
        )
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
