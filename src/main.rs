use std::sync::Arc;

use log::info;
use matchpoint_persistence_memory::{
    MemoryDb, MemoryFollowRepository, MemoryMatchRepository, MemoryRankingRepository,
    MemoryUserRepository,
};
use matchpoint_server_api::jwt::JwtServiceImpl;
use matchpoint_server_domain::{
    app::{AppConfig, construct_app},
    follow::ArcFollowRepository,
    jwt::ArcJwtService,
    matches::ArcMatchRepository,
    ranking::ArcRankingRepository,
    users::ArcUserRepository,
};

mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger();

    let db = MemoryDb::new();
    let match_repository: ArcMatchRepository =
        Arc::new(Box::new(MemoryMatchRepository::new(db.clone())));
    let user_repository: ArcUserRepository =
        Arc::new(Box::new(MemoryUserRepository::new(db.clone())));
    let ranking_repository: ArcRankingRepository =
        Arc::new(Box::new(MemoryRankingRepository::new(db.clone())));
    let follow_repository: ArcFollowRepository =
        Arc::new(Box::new(MemoryFollowRepository::new(db)));

    let jwt_service: ArcJwtService = Arc::new(Box::new(JwtServiceImpl));

    let config = AppConfig {
        telegram_bot_token: std::env::var("MATCHPOINT_TELEGRAM_BOT_TOKEN").ok(),
        demo_password_hash: std::env::var("MATCHPOINT_DEMO_PASSWORD_HASH").ok(),
    };

    let app_state = construct_app(
        match_repository,
        user_repository,
        ranking_repository,
        follow_repository,
        jwt_service,
        config,
    );

    info!("Starting matchpoint server");

    let addr = std::env::var("MATCHPOINT_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    matchpoint_server_api::run(app_state, &addr, shutdown_signal()).await;
}
