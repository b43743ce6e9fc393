use std::sync::LazyLock;

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use matchpoint_server_domain::{
    ServiceError, ServiceResult,
    jwt::JwtService,
    users::UserId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = read_or_generate_secret();
    Keys::new(&secret)
});

fn read_or_generate_secret() -> Vec<u8> {
    if let Ok(secret) = std::env::var("MATCHPOINT_JWT_SECRET") {
        secret.as_bytes().to_vec()
    } else {
        log::warn!("JWT secret not configured, generating a random one");
        Uuid::new_v4().as_bytes().to_vec()
    }
}

pub struct JwtServiceImpl;

impl JwtService for JwtServiceImpl {
    fn generate_jwt(&self, user: UserId) -> ServiceResult<String> {
        let claims = Claims {
            sub: user.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(24)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &KEYS.encoding)
            .map_err(|e| ServiceError::Internal(format!("Failed to sign token: {}", e)))
    }

    fn validate_jwt(&self, token: &str) -> ServiceResult<UserId> {
        let data = decode::<Claims>(token, &KEYS.decoding, &Validation::default())
            .map_err(|_| ServiceError::Unauthorized("Invalid token".into()))?;
        data.claims
            .sub
            .parse()
            .map_err(|_| ServiceError::Unauthorized("Invalid token".into()))
    }
}

/// The authenticated caller, extracted from the bearer token.
pub struct AuthUser(pub UserId);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::from(ServiceError::Unauthorized("Missing bearer token".into())))?;
        let user = JwtServiceImpl.validate_jwt(bearer.token())?;
        Ok(AuthUser(user))
    }
}
