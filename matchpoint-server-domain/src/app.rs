use std::sync::Arc;

use crate::{
    auth::{ArcAuthService, AuthServiceImpl},
    follow::{ArcFollowRepository, ArcFollowService, FollowServiceImpl},
    jwt::ArcJwtService,
    matches::{ArcMatchRepository, ArcMatchService, MatchServiceImpl},
    ranking::{ArcLeaderboardService, ArcRankingRepository, LeaderboardServiceImpl},
    stats::{ArcStatsService, StatsServiceImpl},
    users::{ArcUserRepository, ArcUserService, UserServiceImpl},
};

/// Environment-derived knobs the services need. Both logins stay disabled
/// until their secret is configured.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub telegram_bot_token: Option<String>,
    pub demo_password_hash: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub match_service: ArcMatchService,
    pub stats_service: ArcStatsService,
    pub leaderboard_service: ArcLeaderboardService,
    pub user_service: ArcUserService,
    pub follow_service: ArcFollowService,
    pub auth_service: ArcAuthService,
    pub jwt_service: ArcJwtService,

    pub match_repository: ArcMatchRepository,
    pub user_repository: ArcUserRepository,
    pub ranking_repository: ArcRankingRepository,
    pub follow_repository: ArcFollowRepository,
}

pub fn construct_app(
    match_repository: ArcMatchRepository,
    user_repository: ArcUserRepository,
    ranking_repository: ArcRankingRepository,
    follow_repository: ArcFollowRepository,
    jwt_service: ArcJwtService,
    config: AppConfig,
) -> AppState {
    let user_service: ArcUserService = Arc::new(Box::new(UserServiceImpl::new(
        user_repository.clone(),
    )));

    let match_service: ArcMatchService = Arc::new(Box::new(MatchServiceImpl::new(
        match_repository.clone(),
        user_service.clone(),
    )));

    let stats_service: ArcStatsService =
        Arc::new(Box::new(StatsServiceImpl::new(match_repository.clone())));

    let leaderboard_service: ArcLeaderboardService = Arc::new(Box::new(
        LeaderboardServiceImpl::new(ranking_repository.clone(), user_repository.clone()),
    ));

    let follow_service: ArcFollowService = Arc::new(Box::new(FollowServiceImpl::new(
        follow_repository.clone(),
    )));

    let auth_service: ArcAuthService = Arc::new(Box::new(AuthServiceImpl::new(
        user_repository.clone(),
        ranking_repository.clone(),
        jwt_service.clone(),
        config.telegram_bot_token,
        config.demo_password_hash,
    )));

    AppState {
        match_service,
        stats_service,
        leaderboard_service,
        user_service,
        follow_service,
        auth_service,
        jwt_service,

        match_repository,
        user_repository,
        ranking_repository,
        follow_repository,
    }
}
