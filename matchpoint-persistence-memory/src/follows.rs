use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use matchpoint_server_domain::{
    ServiceError, ServiceResult,
    follow::{Follow, FollowRepository},
    users::UserId,
};

use crate::MemoryDb;

/// Follow edges keyed by the ordered (follower, following) pair. The entry
/// API makes the uniqueness check and the insert one atomic step; follows
/// need no cross-entity transaction, so they live outside the arena lock.
pub struct MemoryFollowRepository {
    db: Arc<MemoryDb>,
    follows: DashMap<(UserId, UserId), Follow>,
}

impl MemoryFollowRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self {
            db,
            follows: DashMap::new(),
        }
    }

    fn check_user_exists(&self, user: UserId) -> ServiceResult<()> {
        if !self.db.read().users.contains_key(&user) {
            return ServiceError::referential(format!("Unknown user {}", user));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl FollowRepository for MemoryFollowRepository {
    async fn create_follow(&self, follower: UserId, following: UserId) -> ServiceResult<Follow> {
        self.check_user_exists(follower)?;
        self.check_user_exists(following)?;
        match self.follows.entry((follower, following)) {
            Entry::Occupied(_) => ServiceError::conflict("Follow already exists"),
            Entry::Vacant(entry) => {
                let follow = Follow {
                    follower,
                    following,
                    created_at: Utc::now(),
                };
                entry.insert(follow.clone());
                Ok(follow)
            }
        }
    }

    async fn delete_follow(&self, follower: UserId, following: UserId) -> ServiceResult<()> {
        match self.follows.remove(&(follower, following)) {
            Some(_) => Ok(()),
            None => ServiceError::not_found("Follow not found"),
        }
    }

    async fn followers_of(&self, user: UserId) -> ServiceResult<Vec<Follow>> {
        Ok(self
            .follows
            .iter()
            .filter(|entry| entry.following == user)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn following_of(&self, user: UserId) -> ServiceResult<Vec<Follow>> {
        Ok(self
            .follows
            .iter()
            .filter(|entry| entry.follower == user)
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use matchpoint_server_domain::users::{NewUser, UserRepository, UserRole};

    use super::*;
    use crate::MemoryUserRepository;

    async fn setup(user_count: usize) -> MemoryFollowRepository {
        let db = MemoryDb::new();
        let users = MemoryUserRepository::new(db.clone());
        for i in 0..user_count {
            users
                .create_user(&NewUser {
                    name: format!("user{}", i + 1),
                    avatar: None,
                    role: UserRole::Player,
                    telegram_id: None,
                })
                .await
                .expect("Failed to create user");
        }
        MemoryFollowRepository::new(db)
    }

    #[tokio::test]
    async fn test_create_follow_is_unique_per_ordered_pair() {
        let repo = setup(2).await;
        repo.create_follow(1, 2).await.expect("Failed to follow");
        let duplicate = repo.create_follow(1, 2).await;
        assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));
        // The reverse edge is a different pair
        repo.create_follow(2, 1).await.expect("Failed to follow");
    }

    #[tokio::test]
    async fn test_create_follow_checks_users() {
        let repo = setup(1).await;
        let result = repo.create_follow(1, 99).await;
        assert!(matches!(result, Err(ServiceError::Referential(_))));
    }

    #[tokio::test]
    async fn test_delete_and_listing() {
        let repo = setup(3).await;
        repo.create_follow(1, 3).await.expect("Failed to follow");
        repo.create_follow(2, 3).await.expect("Failed to follow");

        let followers = repo.followers_of(3).await.expect("Failed to list");
        assert_eq!(followers.len(), 2);
        let following = repo.following_of(1).await.expect("Failed to list");
        assert_eq!(following.len(), 1);

        repo.delete_follow(1, 3).await.expect("Failed to unfollow");
        assert_eq!(repo.followers_of(3).await.expect("Failed to list").len(), 1);
        let missing = repo.delete_follow(1, 3).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }
}
