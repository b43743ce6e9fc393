//! In-memory storage. One arena holds users, matches and rankings behind a
//! single `RwLock`; the repository types are views over it sharing the same
//! `Arc<MemoryDb>`. Match creation takes the write lock once for the match
//! insert plus both participants' counter updates, so no reader can observe
//! one without the other.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use matchpoint_server_domain::{
    matches::{Match, MatchId},
    ranking::Ranking,
    users::{User, UserId},
};

mod follows;
mod matches;
mod rankings;
mod users;

pub use follows::MemoryFollowRepository;
pub use matches::MemoryMatchRepository;
pub use rankings::MemoryRankingRepository;
pub use users::MemoryUserRepository;

#[derive(Default)]
pub(crate) struct Inner {
    pub users: HashMap<UserId, User>,
    pub matches: HashMap<MatchId, Match>,
    // Vec keeps insertion order; the leaderboard's stable tie-break needs it
    pub rankings: Vec<Ranking>,
    pub next_user_id: UserId,
    pub next_match_id: MatchId,
}

pub struct MemoryDb {
    inner: RwLock<Inner>,
}

impl MemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(Inner {
                next_user_id: 1,
                next_match_id: 1,
                ..Inner::default()
            }),
        })
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("Failed to lock memory store")
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("Failed to lock memory store")
    }
}
