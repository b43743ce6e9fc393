use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use matchpoint_core::{MatchOutcome, RawSetScore, SetScore, derive_outcome};

use crate::{
    ServiceError, ServiceResult,
    users::{ArcUserService, UserId},
};

pub type MatchId = i64;

#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub player1: UserId,
    pub player2: UserId,
    pub date: DateTime<Utc>,
    pub sets: Vec<SetScore>,
    pub outcome: MatchOutcome,
    pub match_type: MatchType,
    pub tournament: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn winner(&self) -> Option<UserId> {
        self.outcome.winner_of(self.player1, self.player2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchType {
    Casual,
    Tournament,
    Rated,
}

/// A match submission as it arrives from the transport layer. Sets are still
/// in their boundary encoding; the service normalizes and filters them.
pub struct NewMatch {
    pub player1: UserId,
    pub player2: UserId,
    pub date: DateTime<Utc>,
    pub sets: Vec<RawSetScore>,
    pub match_type: MatchType,
    pub tournament: Option<String>,
    pub notes: Option<String>,
}

/// A validated match ready for insertion: normalized sets, derived outcome.
#[derive(Clone, Debug)]
pub struct MatchRecord {
    pub player1: UserId,
    pub player2: UserId,
    pub date: DateTime<Utc>,
    pub sets: Vec<SetScore>,
    pub outcome: MatchOutcome,
    pub match_type: MatchType,
    pub tournament: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves a field unchanged. The outcome and the
/// participants' counters are not recomputed when the set list changes; see
/// DESIGN.md.
#[derive(Debug, Clone, Default)]
pub struct MatchUpdate {
    pub sets: Option<Vec<SetScore>>,
    pub notes: Option<String>,
    pub tournament: Option<String>,
}

pub type ArcMatchRepository = Arc<Box<dyn MatchRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait MatchRepository {
    /// Stores the match and, in the same critical section, increments
    /// `matches_played` for both participants plus `wins`/`losses` when the
    /// outcome names a winner. An undetermined outcome touches only
    /// `matches_played`. Fails with `Referential` before any mutation when a
    /// participant is unknown. Side effects are visible once this returns.
    async fn create_match(&self, record: &MatchRecord) -> ServiceResult<Match>;
    async fn get_match(&self, id: MatchId) -> ServiceResult<Option<Match>>;
    /// All matches where the user is either participant, in no guaranteed
    /// order.
    async fn matches_for_user(&self, user: UserId) -> ServiceResult<Vec<Match>>;
    async fn update_match(&self, id: MatchId, update: &MatchUpdate) -> ServiceResult<Match>;
}

pub type ArcMatchService = Arc<Box<dyn MatchService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait MatchService {
    async fn record_match(&self, new_match: NewMatch) -> ServiceResult<Match>;
    async fn get_match(&self, id: MatchId) -> ServiceResult<Match>;
    /// Chronologically ascending by match date.
    async fn matches_for_user(&self, user: UserId) -> ServiceResult<Vec<Match>>;
    async fn update_match(&self, id: MatchId, update: MatchUpdate) -> ServiceResult<Match>;
}

pub struct MatchServiceImpl {
    match_repository: ArcMatchRepository,
    user_service: ArcUserService,
}

impl MatchServiceImpl {
    pub fn new(match_repository: ArcMatchRepository, user_service: ArcUserService) -> Self {
        Self {
            match_repository,
            user_service,
        }
    }

    fn normalize_sets(raw: &[RawSetScore]) -> ServiceResult<Vec<SetScore>> {
        let mut sets = Vec::with_capacity(raw.len());
        for entry in raw {
            let set = entry
                .normalize()
                .map_err(|e| ServiceError::Validation(e.to_string()))?;
            // {0,0} is an unfilled form slot
            if set.is_played() {
                sets.push(set);
            }
        }
        if sets.is_empty() {
            return ServiceError::validation("Match contains no played sets");
        }
        Ok(sets)
    }
}

#[async_trait::async_trait]
impl MatchService for MatchServiceImpl {
    async fn record_match(&self, new_match: NewMatch) -> ServiceResult<Match> {
        if new_match.player1 == new_match.player2 {
            return ServiceError::validation("A match needs two distinct participants");
        }
        let sets = Self::normalize_sets(&new_match.sets)?;
        let outcome =
            derive_outcome(&sets).map_err(|e| ServiceError::Validation(e.to_string()))?;

        let record = MatchRecord {
            player1: new_match.player1,
            player2: new_match.player2,
            date: new_match.date,
            sets,
            outcome,
            match_type: new_match.match_type,
            tournament: new_match.tournament,
            notes: new_match.notes,
        };
        let created = self.match_repository.create_match(&record).await?;

        self.user_service.invalidate_cached(created.player1);
        self.user_service.invalidate_cached(created.player2);

        info!(
            "Match {} recorded: {} vs {} ({:?})",
            created.id, created.player1, created.player2, created.outcome
        );
        Ok(created)
    }

    async fn get_match(&self, id: MatchId) -> ServiceResult<Match> {
        match self.match_repository.get_match(id).await? {
            Some(m) => Ok(m),
            None => ServiceError::not_found("Match not found"),
        }
    }

    async fn matches_for_user(&self, user: UserId) -> ServiceResult<Vec<Match>> {
        let mut matches = self.match_repository.matches_for_user(user).await?;
        matches.sort_by_key(|m| m.date);
        Ok(matches)
    }

    async fn update_match(&self, id: MatchId, update: MatchUpdate) -> ServiceResult<Match> {
        // Placeholder sets are filtered here just as on creation, so a stored
        // set list never contains {0,0} entries
        let sets = match update.sets {
            Some(sets) => {
                let played: Vec<SetScore> = sets.into_iter().filter(SetScore::is_played).collect();
                if played.is_empty() {
                    return ServiceError::validation("Match contains no played sets");
                }
                Some(played)
            }
            None => None,
        };
        let update = MatchUpdate {
            sets,
            notes: update.notes,
            tournament: update.tournament,
        };
        let updated = self.match_repository.update_match(id, &update).await?;
        info!("Match {} updated", id);
        Ok(updated)
    }
}
