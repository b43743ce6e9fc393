use std::sync::Arc;

use chrono::Utc;
use matchpoint_server_domain::{
    ServiceResult,
    users::{NewUser, User, UserId, UserRepository, UserUpdate},
};

use crate::MemoryDb;

pub struct MemoryUserRepository {
    db: Arc<MemoryDb>,
}

impl MemoryUserRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_user(&self, id: UserId) -> ServiceResult<Option<User>> {
        Ok(self.db.read().users.get(&id).cloned())
    }

    async fn get_user_by_telegram_id(&self, telegram_id: i64) -> ServiceResult<Option<User>> {
        Ok(self
            .db
            .read()
            .users
            .values()
            .find(|u| u.telegram_id == Some(telegram_id))
            .cloned())
    }

    async fn get_user_by_name(&self, name: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .db
            .read()
            .users
            .values()
            .find(|u| u.name == name)
            .cloned())
    }

    async fn create_user(&self, new_user: &NewUser) -> ServiceResult<User> {
        let mut inner = self.db.write();
        let id = inner.next_user_id;
        inner.next_user_id += 1;
        let user = User {
            id,
            name: new_user.name.clone(),
            avatar: new_user.avatar.clone(),
            role: new_user.role,
            telegram_id: new_user.telegram_id,
            wins: 0,
            losses: 0,
            matches_played: 0,
            created_at: Utc::now(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: UserId, update: &UserUpdate) -> ServiceResult<()> {
        let mut inner = self.db.write();
        if let Some(user) = inner.users.get_mut(&id) {
            if let Some(name) = &update.name {
                user.name = name.clone();
            }
            if let Some(avatar) = &update.avatar {
                user.avatar = Some(avatar.clone());
            }
            if let Some(role) = update.role {
                user.role = role;
            }
        }
        Ok(())
    }

    async fn list_users(&self) -> ServiceResult<Vec<User>> {
        let mut users: Vec<User> = self.db.read().users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}
