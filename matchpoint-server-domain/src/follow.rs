use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::{
    ServiceError, ServiceResult,
    users::UserId,
};

/// Directed edge: follower -> following. Unique per ordered pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Follow {
    pub follower: UserId,
    pub following: UserId,
    pub created_at: DateTime<Utc>,
}

pub type ArcFollowRepository = Arc<Box<dyn FollowRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait FollowRepository {
    /// Fails with `Referential` when either user is unknown and `Conflict`
    /// when the edge already exists.
    async fn create_follow(&self, follower: UserId, following: UserId) -> ServiceResult<Follow>;
    async fn delete_follow(&self, follower: UserId, following: UserId) -> ServiceResult<()>;
    async fn followers_of(&self, user: UserId) -> ServiceResult<Vec<Follow>>;
    async fn following_of(&self, user: UserId) -> ServiceResult<Vec<Follow>>;
}

pub type ArcFollowService = Arc<Box<dyn FollowService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait FollowService {
    async fn follow(&self, follower: UserId, following: UserId) -> ServiceResult<Follow>;
    async fn unfollow(&self, follower: UserId, following: UserId) -> ServiceResult<()>;
    async fn followers_of(&self, user: UserId) -> ServiceResult<Vec<Follow>>;
    async fn following_of(&self, user: UserId) -> ServiceResult<Vec<Follow>>;
}

pub struct FollowServiceImpl {
    follow_repository: ArcFollowRepository,
}

impl FollowServiceImpl {
    pub fn new(follow_repository: ArcFollowRepository) -> Self {
        Self { follow_repository }
    }
}

#[async_trait::async_trait]
impl FollowService for FollowServiceImpl {
    async fn follow(&self, follower: UserId, following: UserId) -> ServiceResult<Follow> {
        if follower == following {
            return ServiceError::validation("Users cannot follow themselves");
        }
        let follow = self.follow_repository.create_follow(follower, following).await?;
        info!("User {} followed user {}", follower, following);
        Ok(follow)
    }

    async fn unfollow(&self, follower: UserId, following: UserId) -> ServiceResult<()> {
        self.follow_repository.delete_follow(follower, following).await?;
        info!("User {} unfollowed user {}", follower, following);
        Ok(())
    }

    async fn followers_of(&self, user: UserId) -> ServiceResult<Vec<Follow>> {
        self.follow_repository.followers_of(user).await
    }

    async fn following_of(&self, user: UserId) -> ServiceResult<Vec<Follow>> {
        self.follow_repository.following_of(user).await
    }
}
