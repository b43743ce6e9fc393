use std::sync::Arc;

use matchpoint_core::stats::{self, MatchSummary, OpponentCount, Streak};

use crate::{
    ServiceResult,
    matches::{ArcMatchRepository, Match},
    users::UserId,
};

/// Aggregate view over a user's match history, recomputed on every read from
/// the stored match list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserStats {
    pub win_rate: u32,
    pub total_matches: u32,
    pub set_win_rate: u32,
    pub current_streak: Streak,
    pub longest_win_streak: u32,
}

pub type ArcStatsService = Arc<Box<dyn StatsService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait StatsService {
    async fn user_stats(&self, user: UserId) -> ServiceResult<UserStats>;
    async fn frequent_opponents(
        &self,
        user: UserId,
        top_n: usize,
    ) -> ServiceResult<Vec<OpponentCount>>;
}

pub struct StatsServiceImpl {
    match_repository: ArcMatchRepository,
}

impl StatsServiceImpl {
    pub fn new(match_repository: ArcMatchRepository) -> Self {
        Self { match_repository }
    }

    /// The repository gives no order guarantee; the streak derivations need
    /// chronological input, so sort here.
    async fn fetch_sorted_summaries(&self, user: UserId) -> ServiceResult<Vec<MatchSummary>> {
        let mut matches = self.match_repository.matches_for_user(user).await?;
        matches.sort_by_key(|m| m.date);
        Ok(matches.iter().map(to_summary).collect())
    }
}

fn to_summary(m: &Match) -> MatchSummary {
    MatchSummary {
        player1: m.player1,
        player2: m.player2,
        outcome: m.outcome,
        sets: m.sets.clone(),
        date: m.date,
    }
}

#[async_trait::async_trait]
impl StatsService for StatsServiceImpl {
    async fn user_stats(&self, user: UserId) -> ServiceResult<UserStats> {
        let summaries = self.fetch_sorted_summaries(user).await?;
        Ok(UserStats {
            win_rate: stats::win_rate(user, &summaries),
            total_matches: summaries.len() as u32,
            set_win_rate: stats::set_win_rate(user, &summaries),
            current_streak: stats::current_streak(user, &summaries),
            longest_win_streak: stats::longest_win_streak(user, &summaries),
        })
    }

    async fn frequent_opponents(
        &self,
        user: UserId,
        top_n: usize,
    ) -> ServiceResult<Vec<OpponentCount>> {
        let summaries = self.fetch_sorted_summaries(user).await?;
        Ok(stats::frequent_opponents(user, &summaries, top_n))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use matchpoint_core::stats::StreakKind;
    use matchpoint_core::{MatchOutcome, SetScore};

    use super::*;
    use crate::matches::{MatchId, MatchRecord, MatchRepository, MatchType, MatchUpdate};
    use crate::{ServiceError, ServiceResult};

    struct FixedMatchRepository {
        matches: Vec<Match>,
    }

    #[async_trait::async_trait]
    impl MatchRepository for FixedMatchRepository {
        async fn create_match(&self, _record: &MatchRecord) -> ServiceResult<Match> {
            ServiceError::internal("not supported")
        }
        async fn get_match(&self, _id: MatchId) -> ServiceResult<Option<Match>> {
            Ok(None)
        }
        async fn matches_for_user(&self, _user: UserId) -> ServiceResult<Vec<Match>> {
            Ok(self.matches.clone())
        }
        async fn update_match(&self, _id: MatchId, _update: &MatchUpdate) -> ServiceResult<Match> {
            ServiceError::not_found("Match not found")
        }
    }

    fn fixture(id: MatchId, day: u32, won: bool) -> Match {
        Match {
            id,
            player1: 1,
            player2: 2,
            date: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            sets: vec![SetScore::new(6, 4), SetScore::new(4, 6), SetScore::new(6, 2)],
            outcome: if won {
                MatchOutcome::Player1
            } else {
                MatchOutcome::Player2
            },
            match_type: MatchType::Casual,
            tournament: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_user_stats_sorts_before_deriving() {
        // Stored out of order: the loss on day 3 must land between the wins
        let repo = FixedMatchRepository {
            matches: vec![
                fixture(4, 5, true),
                fixture(1, 1, true),
                fixture(3, 3, false),
                fixture(5, 6, true),
                fixture(2, 2, true),
                fixture(6, 7, true),
            ],
        };
        let service = StatsServiceImpl::new(Arc::new(Box::new(repo)));
        let stats = service.user_stats(1).await.expect("Failed to get stats");

        assert_eq!(stats.total_matches, 6);
        assert_eq!(stats.win_rate, 83);
        assert_eq!(stats.longest_win_streak, 3);
        assert_eq!(stats.current_streak.length, 3);
        assert_eq!(stats.current_streak.kind, StreakKind::Win);
        // 2 of 3 sets won per match
        assert_eq!(stats.set_win_rate, 67);
    }

    #[tokio::test]
    async fn test_user_stats_empty_history() {
        let service = StatsServiceImpl::new(Arc::new(Box::new(FixedMatchRepository {
            matches: vec![],
        })));
        let stats = service.user_stats(1).await.expect("Failed to get stats");
        assert_eq!(stats.win_rate, 0);
        assert_eq!(stats.total_matches, 0);
        assert_eq!(stats.current_streak.length, 0);
    }
}
