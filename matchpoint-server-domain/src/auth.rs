use std::sync::Arc;

use hmac::{Hmac, Mac};
use log::info;
use sha2::{Digest, Sha256};

use crate::{
    ServiceError, ServiceResult,
    jwt::ArcJwtService,
    ranking::{ArcRankingRepository, DEFAULT_RATING},
    users::{ArcUserRepository, NewUser, User, UserRole, validate_display_name},
};

const TELEGRAM_AUTH_MAX_AGE_SECS: i64 = 60 * 60 * 24;

/// The payload posted by the Telegram login widget. All fields except `hash`
/// feed the data-check string.
#[derive(Clone, Debug)]
pub struct TelegramLogin {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    pub auth_date: i64,
    pub hash: String,
}

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub token: String,
    pub user: User,
}

pub type ArcAuthService = Arc<Box<dyn AuthService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait AuthService {
    async fn login_telegram(&self, login: TelegramLogin) -> ServiceResult<AuthenticatedUser>;
    async fn login_demo(&self, name: &str, password: &str) -> ServiceResult<AuthenticatedUser>;
}

pub struct AuthServiceImpl {
    user_repository: ArcUserRepository,
    ranking_repository: ArcRankingRepository,
    jwt_service: ArcJwtService,
    telegram_bot_token: Option<String>,
    demo_password_hash: Option<String>,
}

impl AuthServiceImpl {
    pub fn new(
        user_repository: ArcUserRepository,
        ranking_repository: ArcRankingRepository,
        jwt_service: ArcJwtService,
        telegram_bot_token: Option<String>,
        demo_password_hash: Option<String>,
    ) -> Self {
        Self {
            user_repository,
            ranking_repository,
            jwt_service,
            telegram_bot_token,
            demo_password_hash,
        }
    }

    /// Telegram signs the sorted `key=value` lines of the payload with
    /// HMAC-SHA256 keyed by SHA256(bot token); the widget puts the hex digest
    /// in `hash`.
    fn check_telegram_hash(&self, login: &TelegramLogin) -> ServiceResult<()> {
        let Some(bot_token) = &self.telegram_bot_token else {
            return ServiceError::unauthorized("Telegram login is not configured");
        };
        let mut fields = vec![
            format!("auth_date={}", login.auth_date),
            format!("first_name={}", login.first_name),
            format!("id={}", login.id),
        ];
        if let Some(last_name) = &login.last_name {
            fields.push(format!("last_name={}", last_name));
        }
        if let Some(photo_url) = &login.photo_url {
            fields.push(format!("photo_url={}", photo_url));
        }
        if let Some(username) = &login.username {
            fields.push(format!("username={}", username));
        }
        fields.sort();
        let data_check = fields.join("\n");

        let Some(provided) = decode_hex(&login.hash) else {
            return ServiceError::unauthorized("Telegram login data has an invalid signature");
        };
        let secret = Sha256::digest(bot_token.as_bytes());
        let mut mac = Hmac::<Sha256>::new_from_slice(&secret)
            .map_err(|e| ServiceError::Internal(format!("Failed to key HMAC: {}", e)))?;
        mac.update(data_check.as_bytes());
        // verify_slice compares in constant time
        if mac.verify_slice(&provided).is_err() {
            return ServiceError::unauthorized("Telegram login data has an invalid signature");
        }
        let age = chrono::Utc::now().timestamp() - login.auth_date;
        if age > TELEGRAM_AUTH_MAX_AGE_SECS {
            return ServiceError::unauthorized("Telegram login data is outdated");
        }
        Ok(())
    }

    async fn fetch_or_create_telegram_user(&self, login: &TelegramLogin) -> ServiceResult<User> {
        if let Some(user) = self
            .user_repository
            .get_user_by_telegram_id(login.id)
            .await?
        {
            return Ok(user);
        }
        let name = match &login.last_name {
            Some(last_name) => format!("{} {}", login.first_name, last_name),
            None => login.first_name.clone(),
        };
        let user = self
            .user_repository
            .create_user(&NewUser {
                name: validate_display_name(&name)?,
                avatar: login.photo_url.clone(),
                role: UserRole::Player,
                telegram_id: Some(login.id),
            })
            .await?;
        self.ranking_repository
            .upsert_ranking(user.id, DEFAULT_RATING)
            .await?;
        info!("Created user {} from Telegram login", user.id);
        Ok(user)
    }
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if !s.is_ascii() || s.len() % 2 != 0 || s.is_empty() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

#[async_trait::async_trait]
impl AuthService for AuthServiceImpl {
    async fn login_telegram(&self, login: TelegramLogin) -> ServiceResult<AuthenticatedUser> {
        self.check_telegram_hash(&login)?;
        let user = self.fetch_or_create_telegram_user(&login).await?;
        let token = self.jwt_service.generate_jwt(user.id)?;
        info!("User {} logged in via Telegram", user.id);
        Ok(AuthenticatedUser { token, user })
    }

    async fn login_demo(&self, name: &str, password: &str) -> ServiceResult<AuthenticatedUser> {
        let Some(demo_hash) = &self.demo_password_hash else {
            return ServiceError::unauthorized("Demo login is not configured");
        };
        let valid = bcrypt::verify(password, demo_hash)
            .map_err(|_| ServiceError::Unauthorized("Invalid demo credentials".into()))?;
        if !valid {
            return ServiceError::unauthorized("Invalid demo credentials");
        }
        let name = validate_display_name(name)?;
        let user = match self.user_repository.get_user_by_name(&name).await? {
            Some(user) => user,
            None => {
                let user = self
                    .user_repository
                    .create_user(&NewUser {
                        name,
                        avatar: None,
                        role: UserRole::Player,
                        telegram_id: None,
                    })
                    .await?;
                self.ranking_repository
                    .upsert_ranking(user.id, DEFAULT_RATING)
                    .await?;
                user
            }
        };
        let token = self.jwt_service.generate_jwt(user.id)?;
        info!("User {} logged in via demo account", user.id);
        Ok(AuthenticatedUser { token, user })
    }
}
