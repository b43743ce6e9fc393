use std::sync::Arc;

use chrono::{DateTime, Utc};
use rustrict::CensorStr;
use validator::Validate;

use crate::{ServiceError, ServiceResult};

pub type UserId = i64;

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub telegram_id: Option<i64>,
    pub wins: u32,
    pub losses: u32,
    pub matches_played: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserRole {
    Player,
    Coach,
}

pub struct NewUser {
    pub name: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub telegram_id: Option<i64>,
}

/// Partial profile update; `None` leaves a field unchanged. Win/loss
/// counters are never updatable here, they belong to match creation.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<UserRole>,
}

pub type ArcUserRepository = Arc<Box<dyn UserRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait UserRepository {
    async fn get_user(&self, id: UserId) -> ServiceResult<Option<User>>;
    async fn get_user_by_telegram_id(&self, telegram_id: i64) -> ServiceResult<Option<User>>;
    async fn get_user_by_name(&self, name: &str) -> ServiceResult<Option<User>>;
    async fn create_user(&self, user: &NewUser) -> ServiceResult<User>;
    async fn update_user(&self, id: UserId, update: &UserUpdate) -> ServiceResult<()>;
    async fn list_users(&self) -> ServiceResult<Vec<User>>;
}

pub type ArcUserService = Arc<Box<dyn UserService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait UserService {
    async fn fetch_user(&self, id: UserId) -> ServiceResult<User>;
    async fn browse(&self, role: Option<UserRole>) -> ServiceResult<Vec<User>>;
    async fn update_profile(&self, id: UserId, update: UserUpdate) -> ServiceResult<User>;
    /// Drops a cached entry; match creation mutates counters behind the
    /// cache's back, so the match service calls this for both participants.
    fn invalidate_cached(&self, id: UserId);
}

#[derive(Validate)]
struct DisplayNameValidator {
    #[validate(length(min = 2, max = 30))]
    name: String,
}

pub fn validate_display_name(name: &str) -> ServiceResult<String> {
    let validator = DisplayNameValidator {
        name: name.trim().to_string(),
    };
    if validator.validate().is_err() {
        return ServiceError::validation("Display name must be between 2 and 30 characters");
    }
    if validator.name.is_inappropriate() {
        return ServiceError::validation("Display name contains inappropriate content");
    }
    Ok(validator.name)
}

const USER_CACHE_CAPACITY: u64 = 1000;
const USER_CACHE_TTL: std::time::Duration = std::time::Duration::from_secs(30);

pub struct UserServiceImpl {
    user_repository: ArcUserRepository,
    user_cache: Arc<moka::sync::Cache<UserId, User>>,
}

impl UserServiceImpl {
    pub fn new(user_repository: ArcUserRepository) -> Self {
        Self {
            user_repository,
            // Short TTL: counters change as a side effect of match creation
            user_cache: Arc::new(
                moka::sync::Cache::builder()
                    .max_capacity(USER_CACHE_CAPACITY)
                    .time_to_live(USER_CACHE_TTL)
                    .build(),
            ),
        }
    }
}

#[async_trait::async_trait]
impl UserService for UserServiceImpl {
    async fn fetch_user(&self, id: UserId) -> ServiceResult<User> {
        if let Some(user) = self.user_cache.get(&id) {
            return Ok(user);
        }
        match self.user_repository.get_user(id).await? {
            Some(user) => {
                self.user_cache.insert(id, user.clone());
                Ok(user)
            }
            None => ServiceError::not_found("User not found"),
        }
    }

    async fn browse(&self, role: Option<UserRole>) -> ServiceResult<Vec<User>> {
        let users = self.user_repository.list_users().await?;
        Ok(match role {
            Some(role) => users.into_iter().filter(|u| u.role == role).collect(),
            None => users,
        })
    }

    async fn update_profile(&self, id: UserId, mut update: UserUpdate) -> ServiceResult<User> {
        if let Some(name) = &update.name {
            update.name = Some(validate_display_name(name)?);
        }
        if self.user_repository.get_user(id).await?.is_none() {
            return ServiceError::not_found("User not found");
        }
        self.user_repository.update_user(id, &update).await?;
        self.user_cache.invalidate(&id);
        self.fetch_user(id).await
    }

    fn invalidate_cached(&self, id: UserId) {
        self.user_cache.invalidate(&id);
    }
}
