use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::warn;

use crate::{
    ServiceResult,
    users::{ArcUserRepository, UserId},
};

pub const DEFAULT_RATING: i32 = 1200;

/// One stored rating per user. The rating itself is an opaque number here;
/// how it moves is out of scope. Rank is never stored, it is derived at read
/// time from the descending rating order.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    pub user_id: UserId,
    pub rating: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub name: String,
    pub avatar: Option<String>,
    pub rating: i32,
}

pub type ArcRankingRepository = Arc<Box<dyn RankingRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait RankingRepository {
    async fn get_ranking(&self, user: UserId) -> ServiceResult<Option<Ranking>>;
    /// All entries in insertion order; the leaderboard's stable tie-break
    /// depends on it.
    async fn all_rankings(&self) -> ServiceResult<Vec<Ranking>>;
    async fn upsert_ranking(&self, user: UserId, rating: i32) -> ServiceResult<Ranking>;
}

pub type ArcLeaderboardService = Arc<Box<dyn LeaderboardService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait LeaderboardService {
    async fn leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>>;
}

pub struct LeaderboardServiceImpl {
    ranking_repository: ArcRankingRepository,
    user_repository: ArcUserRepository,
}

impl LeaderboardServiceImpl {
    pub fn new(ranking_repository: ArcRankingRepository, user_repository: ArcUserRepository) -> Self {
        Self {
            ranking_repository,
            user_repository,
        }
    }
}

#[async_trait::async_trait]
impl LeaderboardService for LeaderboardServiceImpl {
    async fn leaderboard(&self) -> ServiceResult<Vec<LeaderboardEntry>> {
        let mut rankings = self.ranking_repository.all_rankings().await?;
        // Stable sort: equal ratings keep their relative insertion order
        rankings.sort_by(|a, b| b.rating.cmp(&a.rating));

        let mut entries = Vec::with_capacity(rankings.len());
        for (position, ranking) in rankings.into_iter().enumerate() {
            // Lenient join: a ranking without a resolvable user still shows
            let (name, avatar) = match self.user_repository.get_user(ranking.user_id).await? {
                Some(user) => (user.name, user.avatar),
                None => {
                    warn!("Ranking entry for unknown user {}", ranking.user_id);
                    (String::new(), None)
                }
            };
            entries.push(LeaderboardEntry {
                rank: position as u32 + 1,
                user_id: ranking.user_id,
                name,
                avatar,
                rating: ranking.rating,
            });
        }
        Ok(entries)
    }
}
