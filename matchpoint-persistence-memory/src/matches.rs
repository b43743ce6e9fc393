use std::sync::Arc;

use chrono::Utc;
use matchpoint_server_domain::{
    ServiceError, ServiceResult,
    matches::{Match, MatchId, MatchRecord, MatchRepository, MatchUpdate},
    users::UserId,
};

use crate::MemoryDb;

pub struct MemoryMatchRepository {
    db: Arc<MemoryDb>,
}

impl MemoryMatchRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl MatchRepository for MemoryMatchRepository {
    async fn create_match(&self, record: &MatchRecord) -> ServiceResult<Match> {
        // One write lock spans the referential checks, the insert and the
        // counter updates; a concurrent reader sees all of it or none of it.
        let mut inner = self.db.write();
        if !inner.users.contains_key(&record.player1) {
            return ServiceError::referential(format!("Unknown participant {}", record.player1));
        }
        if !inner.users.contains_key(&record.player2) {
            return ServiceError::referential(format!("Unknown participant {}", record.player2));
        }

        let id = inner.next_match_id;
        inner.next_match_id += 1;
        let created = Match {
            id,
            player1: record.player1,
            player2: record.player2,
            date: record.date,
            sets: record.sets.clone(),
            outcome: record.outcome,
            match_type: record.match_type,
            tournament: record.tournament.clone(),
            notes: record.notes.clone(),
            created_at: Utc::now(),
        };
        inner.matches.insert(id, created.clone());

        for participant in [record.player1, record.player2] {
            if let Some(user) = inner.users.get_mut(&participant) {
                user.matches_played += 1;
            }
        }
        if let Some(winner) = record.outcome.winner_of(record.player1, record.player2) {
            let loser = if winner == record.player1 {
                record.player2
            } else {
                record.player1
            };
            if let Some(user) = inner.users.get_mut(&winner) {
                user.wins += 1;
            }
            if let Some(user) = inner.users.get_mut(&loser) {
                user.losses += 1;
            }
        }
        Ok(created)
    }

    async fn get_match(&self, id: MatchId) -> ServiceResult<Option<Match>> {
        Ok(self.db.read().matches.get(&id).cloned())
    }

    async fn matches_for_user(&self, user: UserId) -> ServiceResult<Vec<Match>> {
        Ok(self
            .db
            .read()
            .matches
            .values()
            .filter(|m| m.player1 == user || m.player2 == user)
            .cloned()
            .collect())
    }

    async fn update_match(&self, id: MatchId, update: &MatchUpdate) -> ServiceResult<Match> {
        let mut inner = self.db.write();
        let Some(stored) = inner.matches.get_mut(&id) else {
            return ServiceError::not_found("Match not found");
        };
        // Field replacement only: the outcome and the participants' counters
        // stay as recorded at creation even when the set list changes.
        if let Some(sets) = &update.sets {
            stored.sets = sets.clone();
        }
        if let Some(notes) = &update.notes {
            stored.notes = Some(notes.clone());
        }
        if let Some(tournament) = &update.tournament {
            stored.tournament = Some(tournament.clone());
        }
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use matchpoint_core::{MatchOutcome, SetScore};
    use matchpoint_server_domain::{
        matches::MatchType,
        users::{NewUser, User, UserRepository, UserRole},
    };

    use super::*;
    use crate::MemoryUserRepository;

    async fn setup() -> (Arc<MemoryDb>, MemoryMatchRepository, User, User) {
        let db = MemoryDb::new();
        let users = MemoryUserRepository::new(db.clone());
        let ana = users
            .create_user(&NewUser {
                name: "ana".to_string(),
                avatar: None,
                role: UserRole::Player,
                telegram_id: None,
            })
            .await
            .expect("Failed to create user");
        let ben = users
            .create_user(&NewUser {
                name: "ben".to_string(),
                avatar: None,
                role: UserRole::Player,
                telegram_id: None,
            })
            .await
            .expect("Failed to create user");
        (db.clone(), MemoryMatchRepository::new(db), ana, ben)
    }

    fn record(player1: UserId, player2: UserId, outcome: MatchOutcome) -> MatchRecord {
        MatchRecord {
            player1,
            player2,
            date: Utc::now(),
            sets: vec![SetScore::new(6, 3), SetScore::new(6, 4)],
            outcome,
            match_type: MatchType::Casual,
            tournament: None,
            notes: None,
        }
    }

    async fn counters(db: &Arc<MemoryDb>, id: UserId) -> (u32, u32, u32) {
        let inner = db.read();
        let user = inner.users.get(&id).expect("User missing");
        (user.wins, user.losses, user.matches_played)
    }

    #[tokio::test]
    async fn test_create_match_updates_both_participants() {
        let (db, repo, ana, ben) = setup().await;
        let created = repo
            .create_match(&record(ana.id, ben.id, MatchOutcome::Player1))
            .await
            .expect("Failed to create match");

        assert_eq!(created.winner(), Some(ana.id));
        assert_eq!(counters(&db, ana.id).await, (1, 0, 1));
        assert_eq!(counters(&db, ben.id).await, (0, 1, 1));
    }

    #[tokio::test]
    async fn test_create_match_undetermined_touches_matches_played_only() {
        let (db, repo, ana, ben) = setup().await;
        repo.create_match(&record(ana.id, ben.id, MatchOutcome::Undetermined))
            .await
            .expect("Failed to create match");

        assert_eq!(counters(&db, ana.id).await, (0, 0, 1));
        assert_eq!(counters(&db, ben.id).await, (0, 0, 1));
    }

    #[tokio::test]
    async fn test_create_match_unknown_participant_mutates_nothing() {
        let (db, repo, ana, _) = setup().await;
        let result = repo
            .create_match(&record(ana.id, 999, MatchOutcome::Player1))
            .await;
        assert!(matches!(result, Err(ServiceError::Referential(_))));
        assert!(db.read().matches.is_empty());
        assert_eq!(counters(&db, ana.id).await, (0, 0, 0));
    }

    #[tokio::test]
    async fn test_matches_for_user_finds_either_side() {
        let (_, repo, ana, ben) = setup().await;
        repo.create_match(&record(ana.id, ben.id, MatchOutcome::Player1))
            .await
            .expect("Failed to create match");
        repo.create_match(&record(ben.id, ana.id, MatchOutcome::Player2))
            .await
            .expect("Failed to create match");

        let for_ana = repo
            .matches_for_user(ana.id)
            .await
            .expect("Failed to get matches");
        assert_eq!(for_ana.len(), 2);
        let for_ben = repo
            .matches_for_user(ben.id)
            .await
            .expect("Failed to get matches");
        assert_eq!(for_ben.len(), 2);
        assert!(
            repo.matches_for_user(999)
                .await
                .expect("Failed to get matches")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_update_match_does_not_readjust_counters() {
        let (db, repo, ana, ben) = setup().await;
        let created = repo
            .create_match(&record(ana.id, ben.id, MatchOutcome::Player1))
            .await
            .expect("Failed to create match");

        let updated = repo
            .update_match(
                created.id,
                &MatchUpdate {
                    sets: Some(vec![SetScore::new(1, 6), SetScore::new(2, 6)]),
                    notes: Some("rain delay".to_string()),
                    tournament: None,
                },
            )
            .await
            .expect("Failed to update match");

        // Sets replaced, outcome and counters untouched
        assert_eq!(updated.sets, vec![SetScore::new(1, 6), SetScore::new(2, 6)]);
        assert_eq!(updated.outcome, MatchOutcome::Player1);
        assert_eq!(updated.notes.as_deref(), Some("rain delay"));
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(counters(&db, ana.id).await, (1, 0, 1));
        assert_eq!(counters(&db, ben.id).await, (0, 1, 1));
    }

    #[tokio::test]
    async fn test_update_match_unknown_id() {
        let (_, repo, _, _) = setup().await;
        let result = repo.update_match(123, &MatchUpdate::default()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
