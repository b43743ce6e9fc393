use std::sync::Arc;

use chrono::Utc;
use matchpoint_server_domain::{
    ServiceResult,
    ranking::{Ranking, RankingRepository},
    users::UserId,
};

use crate::MemoryDb;

pub struct MemoryRankingRepository {
    db: Arc<MemoryDb>,
}

impl MemoryRankingRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl RankingRepository for MemoryRankingRepository {
    async fn get_ranking(&self, user: UserId) -> ServiceResult<Option<Ranking>> {
        Ok(self
            .db
            .read()
            .rankings
            .iter()
            .find(|r| r.user_id == user)
            .cloned())
    }

    async fn all_rankings(&self) -> ServiceResult<Vec<Ranking>> {
        Ok(self.db.read().rankings.clone())
    }

    async fn upsert_ranking(&self, user: UserId, rating: i32) -> ServiceResult<Ranking> {
        let mut inner = self.db.write();
        // Updates keep the entry's position; insertion order is the
        // leaderboard's tie-break
        if let Some(existing) = inner.rankings.iter_mut().find(|r| r.user_id == user) {
            existing.rating = rating;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        let ranking = Ranking {
            user_id: user,
            rating,
            updated_at: Utc::now(),
        };
        inner.rankings.push(ranking.clone());
        Ok(ranking)
    }
}

#[cfg(test)]
mod tests {
    use matchpoint_server_domain::ranking::DEFAULT_RATING;

    use super::*;

    #[tokio::test]
    async fn test_upsert_preserves_insertion_order() {
        let repo = MemoryRankingRepository::new(MemoryDb::new());
        repo.upsert_ranking(1, DEFAULT_RATING)
            .await
            .expect("Failed to upsert");
        repo.upsert_ranking(2, DEFAULT_RATING)
            .await
            .expect("Failed to upsert");
        repo.upsert_ranking(3, DEFAULT_RATING)
            .await
            .expect("Failed to upsert");
        // Re-rating user 1 must not move it behind the others
        repo.upsert_ranking(1, 1300).await.expect("Failed to upsert");

        let all = repo.all_rankings().await.expect("Failed to list rankings");
        let order: Vec<UserId> = all.iter().map(|r| r.user_id).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(all[0].rating, 1300);
    }

    #[tokio::test]
    async fn test_get_ranking() {
        let repo = MemoryRankingRepository::new(MemoryDb::new());
        assert_eq!(repo.get_ranking(1).await.expect("Failed to get"), None);
        repo.upsert_ranking(1, DEFAULT_RATING)
            .await
            .expect("Failed to upsert");
        let ranking = repo
            .get_ranking(1)
            .await
            .expect("Failed to get")
            .expect("Ranking missing");
        assert_eq!(ranking.rating, DEFAULT_RATING);
    }
}
